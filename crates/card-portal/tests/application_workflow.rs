//! End-to-end applicant journey: sign in, walk the wizard, submit once, then
//! read the application back, all through the public API against a stub server.

mod common {
    use std::sync::{Arc, Mutex};

    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{extract::State, Json, Router};
    use reqwest::Url;
    use serde_json::{json, Value};

    use card_portal::api::HttpApi;
    use card_portal::config::ApiConfig;

    #[derive(Clone, Default)]
    pub struct Submissions(Arc<Mutex<Vec<(Option<String>, Value)>>>);

    impl Submissions {
        pub fn all(&self) -> Vec<(Option<String>, Value)> {
            self.0.lock().expect("submissions mutex").clone()
        }
    }

    async fn login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
        if body["password"] != "secret123" {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "success": false,
                    "error": { "code": "INVALID_CREDENTIALS", "message": "Invalid email or password" }
                })),
            );
        }
        (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "accessToken": "access-1",
                    "refreshToken": "refresh-1",
                    "user": { "id": "u-1", "email": body["email"], "role": "applicant" }
                }
            })),
        )
    }

    async fn submit(
        State(submissions): State<Submissions>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        let bearer = headers
            .get("authorization")
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        submissions
            .0
            .lock()
            .expect("submissions mutex")
            .push((bearer, body));
        (
            StatusCode::CREATED,
            Json(json!({
                "success": true,
                "message": "Application submitted successfully",
                "data": {
                    "applicationNumber": "CC2025000123",
                    "status": "approved",
                    "creditInfo": {
                        "creditScore": 781,
                        "creditLimit": 100000,
                        "retrievedAt": "2025-06-15T09:30:05Z"
                    },
                    "submittedAt": "2025-06-15T09:30:00Z"
                }
            })),
        )
    }

    pub async fn spawn_portal() -> (HttpApi, Submissions) {
        let submissions = Submissions::default();
        let router = Router::new()
            .route("/api/auth/login", post(login))
            .route("/api/applications", post(submit))
            .with_state(submissions.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("stub server runs");
        });

        let api = HttpApi::new(&ApiConfig {
            base_url: Url::parse(&format!("http://{addr}/api")).expect("valid url"),
            timeout_secs: 5,
        })
        .expect("client builds");
        (api, submissions)
    }
}

use chrono::NaiveDate;

use card_portal::api::ApiError;
use card_portal::domain::{ApplicationStatus, Credentials, EmploymentType};
use card_portal::format::format_rupees;
use card_portal::session::{
    AuthSession, MemorySessionStore, Route, RouteDecision, SessionError,
};
use card_portal::validation::{EmploymentInfoDraft, PersonalInfoDraft};
use card_portal::wizard::{ApplicationWizard, EmploymentStep, PersonalStep, WizardStep};

use common::spawn_portal;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 15).expect("valid date")
}

fn credentials(password: &str) -> Credentials {
    Credentials {
        email: "asha@example.com".to_string(),
        password: password.to_string(),
    }
}

#[tokio::test]
async fn applicant_signs_in_and_submits_once() {
    let (api, submissions) = spawn_portal().await;
    let mut session = AuthSession::restore(MemorySessionStore::default());
    assert_eq!(
        session.authorize(&Route::Dashboard),
        RouteDecision::Redirect(Route::Login)
    );

    session
        .login(&api, &credentials("secret123"))
        .await
        .expect("login succeeds");
    assert_eq!(session.authorize(&Route::ApplicationNew), RouteDecision::Allow);
    assert_eq!(
        session.authorize(&Route::AdminApplications),
        RouteDecision::Redirect(Route::Dashboard)
    );
    let api = api.with_access_token(session.access_token().map(str::to_string));

    let mut wizard = ApplicationWizard::new();
    let personal = PersonalInfoDraft {
        full_name: "Asha Verma".to_string(),
        date_of_birth: "1990-04-12".to_string(),
        email: "asha@example.com".to_string(),
        phone: "+91 98765 43210".to_string(),
        pan_card: "ABCDE1234F".to_string(),
        street: "12 MG Road".to_string(),
        city: "Pune".to_string(),
        state: "Maharashtra".to_string(),
        pincode: "411001".to_string(),
    };
    wizard
        .submit_step::<PersonalStep>(&personal, today())
        .expect("personal accepted");

    let employment = EmploymentInfoDraft {
        employment_type: Some(EmploymentType::SelfEmployed),
        annual_income: "4,50,000".to_string(),
        company_name: "Verma Designs".to_string(),
        designation: "Owner".to_string(),
    };
    wizard
        .submit_step::<EmploymentStep>(&employment, today())
        .expect("employment accepted");
    assert_eq!(wizard.step(), &WizardStep::Review);

    wizard.accept_terms(true);
    let receipt = wizard.submit(&api).await.expect("submission succeeds");
    assert_eq!(receipt.application_number, "CC2025000123");
    assert_eq!(receipt.status, ApplicationStatus::Approved);
    assert_eq!(
        receipt.credit_info.as_ref().map(|info| format_rupees(info.credit_limit)),
        Some("₹1,00,000".to_string())
    );

    let sent = submissions.all();
    assert_eq!(sent.len(), 1);
    let (bearer, body) = &sent[0];
    assert_eq!(bearer.as_deref(), Some("Bearer access-1"));
    assert_eq!(body["personalInfo"]["fullName"], "Asha Verma");
    assert_eq!(body["personalInfo"]["dateOfBirth"], "1990-04-12");
    assert_eq!(body["personalInfo"]["address"]["city"], "Pune");
    assert_eq!(body["employmentInfo"]["employmentType"], "self-employed");
    assert_eq!(body["employmentInfo"]["annualIncome"], 450000);
}

#[tokio::test]
async fn wrong_password_keeps_the_visitor_signed_out() {
    let (api, submissions) = spawn_portal().await;
    let store = MemorySessionStore::default();
    let mut session = AuthSession::restore(store.clone());

    let err = session
        .login(&api, &credentials("nope"))
        .await
        .expect_err("rejected");
    let SessionError::Api(api_err) = &err else {
        panic!("expected an api error, got {err:?}");
    };
    assert!(matches!(api_err, ApiError::Unauthorized(_)));
    assert_eq!(api_err.user_message("Login failed"), "Invalid email or password");
    assert!(!session.is_authenticated());
    assert!(store.snapshot().is_empty());
    assert!(submissions.all().is_empty());
}
