pub(crate) mod admin;
pub(crate) mod applications;
pub(crate) mod apply;
pub(crate) mod auth;
