use log::info;

use crate::middleware::auth::AuthContext;
use crate::user::model::{AuthData, CreateUserInput, User};
use crate::user::service::{UserRepository, email_exists};
use crate::utils::credentials::CredentialService;
use crate::utils::error::{CustomError, FieldError};
use crate::utils::validation;

fn user_not_found() -> CustomError {
    CustomError::NotFoundError("No user found!".to_string())
}

pub async fn create_user(
    users: &dyn UserRepository,
    credentials: &CredentialService,
    input: Option<CreateUserInput>,
) -> Result<User, CustomError> {
    let CreateUserInput {
        email,
        name,
        password,
    } = input.ok_or_else(|| {
        CustomError::ValidationError(vec![FieldError::new("User input is required.")])
    })?;

    validation::validate_registration(&email, &password)?;

    if users.find_by_email(&email).await?.is_some() {
        return Err(email_exists());
    }

    let hashed_password = credentials.hash_password(&password)?;
    let user = users.insert(User::new(email, name, hashed_password)).await?;

    info!("Registered user {}", user.id);
    Ok(user)
}

pub async fn login(
    users: &dyn UserRepository,
    credentials: &CredentialService,
    email: &str,
    password: &str,
) -> Result<AuthData, CustomError> {
    let user = users
        .find_by_email(email)
        .await?
        .ok_or_else(|| CustomError::UnauthenticatedError("User not found.".to_string()))?;

    if !credentials.verify_password(password, &user.password)? {
        return Err(CustomError::UnauthenticatedError(
            "Password is incorrect.".to_string(),
        ));
    }

    let user_id = user.id.to_hex();
    let token = credentials.create_token(&user_id, &user.email)?;

    Ok(AuthData { token, user_id })
}

pub async fn current_user(
    users: &dyn UserRepository,
    auth: &AuthContext,
) -> Result<User, CustomError> {
    let user_id = auth.require_user()?;

    users.find_by_id(&user_id).await?.ok_or_else(user_not_found)
}

pub async fn update_status(
    users: &dyn UserRepository,
    auth: &AuthContext,
    status: &str,
) -> Result<User, CustomError> {
    let user_id = auth.require_user()?;

    users
        .update_status(&user_id, status)
        .await?
        .ok_or_else(user_not_found)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::middleware::auth::AuthContext;
    use crate::test_support::{TestApp, data, error_code};

    const CREATE_USER: &str = r#"
        mutation($input: userInfo) {
            createUser(userInput: $input) { _id email name status password posts { _id } }
        }
    "#;

    const LOGIN: &str = r#"
        query($email: String!, $password: String!) {
            login(email: $email, password: $password) { token userId }
        }
    "#;

    #[actix_web::test]
    async fn registration_returns_new_user_with_default_status() {
        let app = TestApp::new();
        let response = app
            .execute(
                CREATE_USER,
                json!({ "input": { "email": "max@example.com", "name": "Max", "password": "secret123" } }),
                AuthContext::anonymous(),
            )
            .await;

        assert!(response.errors.is_empty(), "{:?}", response.errors);
        let body = data(&response);
        let user = &body["createUser"];
        assert_eq!(user["email"], "max@example.com");
        assert_eq!(user["status"], "I am new!");
        assert_eq!(user["posts"], json!([]));
        assert_ne!(user["password"], "secret123");
    }

    #[actix_web::test]
    async fn duplicate_email_fails_before_any_write() {
        let app = TestApp::new();
        app.register("max@example.com", "secret123").await;

        let response = app
            .execute(
                CREATE_USER,
                json!({ "input": { "email": "max@example.com", "name": "Other", "password": "secret456" } }),
                AuthContext::anonymous(),
            )
            .await;

        assert_eq!(error_code(&response), 500);
        assert_eq!(response.errors[0].message, "Email exists, try logging in!");
        assert_eq!(*app.users.inserts.lock().unwrap(), 1);
    }

    #[actix_web::test]
    async fn invalid_registration_reports_every_field() {
        let app = TestApp::new();
        let response = app
            .execute(
                CREATE_USER,
                json!({ "input": { "email": "not-an-email", "name": "Max", "password": "12345" } }),
                AuthContext::anonymous(),
            )
            .await;

        assert_eq!(error_code(&response), 422);
        assert_eq!(response.errors[0].message, "Invalid input.");
        let ext = serde_json::to_value(response.errors[0].extensions.as_ref().unwrap()).unwrap();
        assert_eq!(ext["data"].as_array().map(Vec::len), Some(2));
        assert_eq!(*app.users.inserts.lock().unwrap(), 0);
    }

    #[actix_web::test]
    async fn login_returns_token_for_registered_user() {
        let app = TestApp::new();
        let user_id = app.register("max@example.com", "secret123").await;

        let response = app
            .execute(
                LOGIN,
                json!({ "email": "max@example.com", "password": "secret123" }),
                AuthContext::anonymous(),
            )
            .await;

        assert!(response.errors.is_empty(), "{:?}", response.errors);
        let body = data(&response);
        let auth = &body["login"];
        assert_eq!(auth["userId"], user_id.as_str());

        let claims = app
            .credentials
            .decode_token(auth["token"].as_str().unwrap())
            .unwrap();
        assert_eq!(claims.user_id, user_id);
        assert_eq!(claims.email, "max@example.com");
    }

    #[actix_web::test]
    async fn login_rejects_unknown_email_and_wrong_password() {
        let app = TestApp::new();
        app.register("max@example.com", "secret123").await;

        let unknown = app
            .execute(
                LOGIN,
                json!({ "email": "nobody@example.com", "password": "secret123" }),
                AuthContext::anonymous(),
            )
            .await;
        assert_eq!(error_code(&unknown), 401);
        assert_eq!(unknown.errors[0].message, "User not found.");

        let wrong = app
            .execute(
                LOGIN,
                json!({ "email": "max@example.com", "password": "secret124" }),
                AuthContext::anonymous(),
            )
            .await;
        assert_eq!(error_code(&wrong), 401);
        assert_eq!(wrong.errors[0].message, "Password is incorrect.");
    }

    #[actix_web::test]
    async fn user_and_status_require_authentication() {
        let app = TestApp::new();
        let user_id = app.register("max@example.com", "secret123").await;

        let anonymous = app
            .execute("{ user { _id } }", json!({}), AuthContext::anonymous())
            .await;
        assert_eq!(error_code(&anonymous), 401);

        let updated = app
            .execute(
                r#"mutation { updateStatus(status: "Writing Rust") { _id status } }"#,
                json!({}),
                AuthContext::authenticated(user_id.clone()),
            )
            .await;
        assert!(updated.errors.is_empty(), "{:?}", updated.errors);
        assert_eq!(data(&updated)["updateStatus"]["status"], "Writing Rust");

        let me = app
            .execute(
                "{ user { _id status } }",
                json!({}),
                AuthContext::authenticated(user_id.clone()),
            )
            .await;
        assert_eq!(data(&me)["user"]["_id"], user_id.as_str());
        assert_eq!(data(&me)["user"]["status"], "Writing Rust");
    }

    #[actix_web::test]
    async fn unknown_user_is_not_found() {
        let app = TestApp::new();
        let ghost = mongodb::bson::oid::ObjectId::new().to_hex();

        let response = app
            .execute("{ user { _id } }", json!({}), AuthContext::authenticated(ghost))
            .await;
        assert_eq!(error_code(&response), 404);
        assert_eq!(response.errors[0].message, "No user found!");
    }
}
