// UI layer: terminal prompts for the operator and the top-to-bottom
// provisioning flow. Everything runs sequentially; the only suspension
// points are terminal reads and in-flight HTTP calls.

use crate::api::{ApiClient, AuthRequest, EmployeeCreation, OwnerAdminRequest};
use anyhow::{Context, Result};
use dialoguer::{Input, Password};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Everything collected from the operator before any provisioning call
/// is made. Values are free text, trimmed, with no format validation.
pub struct NewAdminInput {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub date_of_birth: String,
    pub address: String,
    pub emergency_contact_name: String,
    pub emergency_contact_relation: String,
    pub emergency_contact_phone: String,
    pub building_name: String,
    pub department_name: String,
    pub temp_password: String,
}

/// Run the whole interactive flow: authenticate, collect the new admin's
/// details, then provision. Exit-code policy:
/// - login failure or missing token: exit 1
/// - building/department resolution failure: exit 1
/// - employee creation rejected by the server: reported, normal exit
pub fn run(mut api: ApiClient) -> Result<()> {
    println!("--- Create New Building Owner Admin ---");
    let admin_email = prompt_text("Admin email for authentication", true)?;
    let admin_password = prompt_password("Admin password")?;

    let spinner = start_spinner("Logging in...");
    let login = api.login(&AuthRequest {
        email: admin_email,
        password: admin_password,
    });
    spinner.finish_and_clear();
    let resp = match login {
        Ok(r) => r,
        Err(e) => {
            println!("{:#}", e);
            std::process::exit(1);
        }
    };
    let token = match resp.token.filter(|t| !t.is_empty()) {
        Some(t) => t,
        None => {
            println!("No token received!");
            std::process::exit(1);
        }
    };
    api.set_token(&token);

    println!("\n--- New Owner Admin Info ---");
    let input = collect_admin_input()?;

    let spinner = start_spinner("Provisioning...");
    let outcome = provision(&api, &input);
    spinner.finish_and_clear();
    match outcome {
        Ok(EmployeeCreation::Created) => {
            println!("\nSuccess! Owner admin created: {}", input.email);
            println!("Temporary password: {}", input.temp_password);
        }
        Ok(EmployeeCreation::Rejected { status, body }) => {
            println!("Failed to create admin: {} {}", status, body);
        }
        Err(e) => {
            println!("{:#}", e);
            std::process::exit(1);
        }
    }
    Ok(())
}

/// Resolve the building and department ids, then create the employee
/// record. An Err here is the fatal path (a lookup-or-create failed and
/// nothing further should be attempted); a Rejected outcome is the
/// non-fatal one the caller merely reports.
pub fn provision(api: &ApiClient, input: &NewAdminInput) -> Result<EmployeeCreation> {
    let building_id = api
        .resolve_or_create("buildings", &input.building_name)
        .context("Failed to create building")?;
    let department_id = api
        .resolve_or_create("departments", &input.department_name)
        .context("Failed to create department")?;

    let req = OwnerAdminRequest {
        email: input.email.clone(),
        password: input.temp_password.clone(),
        first_name: input.first_name.clone(),
        last_name: input.last_name.clone(),
        role: "ADMIN".into(),
        department_id,
        building_id,
        active: true,
        must_change_password: true,
        phone_number: input.phone_number.clone(),
        date_of_birth: input.date_of_birth.clone(),
        address: input.address.clone(),
        emergency_contact_name: input.emergency_contact_name.clone(),
        emergency_contact_relation: input.emergency_contact_relation.clone(),
        emergency_contact_phone: input.emergency_contact_phone.clone(),
    };
    api.create_employee(&req)
}

fn collect_admin_input() -> Result<NewAdminInput> {
    Ok(NewAdminInput {
        email: prompt_text("Owner admin email", true)?,
        first_name: prompt_text("First name", true)?,
        last_name: prompt_text("Last name", true)?,
        phone_number: prompt_text("Phone number", true)?,
        date_of_birth: prompt_text("Date of birth (YYYY-MM-DD)", true)?,
        address: prompt_text("Address", true)?,
        emergency_contact_name: prompt_text("Emergency contact name", true)?,
        emergency_contact_relation: prompt_text("Emergency contact relation", true)?,
        emergency_contact_phone: prompt_text("Emergency contact phone", true)?,
        building_name: prompt_text("Building name", true)?,
        department_name: prompt_text("Department name (e.g. Front Desk)", true)?,
        temp_password: prompt_password("Temporary password (will require change on first login)")?,
    })
}

/// Prompt for a line of input. Required fields re-prompt until something
/// non-empty (after trimming) is entered; optional fields accept anything.
fn prompt_text(label: &str, required: bool) -> Result<String> {
    loop {
        let raw: String = Input::new()
            .with_prompt(label)
            .allow_empty(true)
            .interact_text()?;
        match accept(&raw, required) {
            Some(v) => return Ok(v),
            None => println!("This field is required."),
        }
    }
}

/// Same contract as `prompt_text` for required fields, but the input is
/// not echoed to the terminal.
fn prompt_password(label: &str) -> Result<String> {
    loop {
        let raw = Password::new()
            .with_prompt(label)
            .allow_empty_password(true)
            .interact()?;
        match accept(&raw, true) {
            Some(v) => return Ok(v),
            None => println!("This field is required."),
        }
    }
}

/// Acceptance rule shared by the prompts: trim the raw line, then reject
/// it only when the field is required and nothing is left.
fn accept(raw: &str, required: bool) -> Option<String> {
    let value = raw.trim();
    if required && value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn start_spinner(msg: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}").unwrap());
    spinner.set_message(msg.to_string());
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_input() -> NewAdminInput {
        NewAdminInput {
            email: "owner@example.com".into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            phone_number: "555-0100".into(),
            date_of_birth: "1990-01-01".into(),
            address: "1 Tower Rd".into(),
            emergency_contact_name: "Grace".into(),
            emergency_contact_relation: "Sister".into(),
            emergency_contact_phone: "555-0101".into(),
            building_name: "Tower A".into(),
            department_name: "Front Desk".into(),
            temp_password: "temp123".into(),
        }
    }

    // provision() is blocking; run it off the tokio workers.
    async fn provision_against(server: &MockServer) -> Result<EmployeeCreation> {
        let base = server.uri();
        tokio::task::spawn_blocking(move || {
            let mut api = ApiClient::new(base).unwrap();
            api.set_token("abc");
            provision(&api, &sample_input())
        })
        .await
        .unwrap()
    }

    #[test]
    fn required_input_is_trimmed_and_non_empty() {
        assert_eq!(accept("  Tower A  ", true), Some("Tower A".to_string()));
        assert_eq!(accept("", true), None);
        assert_eq!(accept("   ", true), None);
        assert_eq!(accept("", false), Some(String::new()));
    }

    #[tokio::test]
    async fn existing_building_new_department_creates_admin() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/buildings/by-name/Tower%20A"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/buildings"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/departments/by-name/Front%20Desk"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/departments"))
            .and(body_partial_json(json!({"name": "Front Desk"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 7})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/employees"))
            .and(header("authorization", "Bearer abc"))
            .and(body_partial_json(json!({
                "email": "owner@example.com",
                "role": "ADMIN",
                "buildingId": 1,
                "departmentId": 7,
                "active": true,
                "mustChangePassword": true,
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = provision_against(&server).await.unwrap();
        assert!(matches!(outcome, EmployeeCreation::Created));
    }

    #[tokio::test]
    async fn employee_conflict_is_reported_with_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/buildings/by-name/Tower%20A"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/departments/by-name/Front%20Desk"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 7})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/employees"))
            .respond_with(ResponseTemplate::new(409).set_body_string("duplicate email"))
            .mount(&server)
            .await;

        let outcome = provision_against(&server).await.unwrap();
        match outcome {
            EmployeeCreation::Rejected { status, body } => {
                assert_eq!(status, 409);
                assert_eq!(body, "duplicate email");
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn department_create_failure_stops_before_employee_call() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/buildings/by-name/Tower%20A"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/departments/by-name/Front%20Desk"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/departments"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/employees"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = provision_against(&server).await.unwrap_err();
        let msg = format!("{:#}", err);
        assert!(msg.contains("Failed to create department"), "message was: {}", msg);
        assert!(msg.contains("boom"), "message was: {}", msg);
    }
}
