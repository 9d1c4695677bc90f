mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use common::{today, Session, TestApp};
use serde_json::{json, Value};

fn meal(amount: f64, vendor: &str) -> Value {
    json!({
        "amount": amount,
        "category": "Meals",
        "vendor": vendor,
        "expenseDate": today(),
    })
}

fn multipart(content_type: &str, bytes: &[u8]) -> (String, Vec<u8>) {
    let boundary = "spendwise-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"receipt\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={boundary}"), body)
}

async fn upload(
    app: &TestApp,
    session: &Session,
    content_type: &str,
    bytes: &[u8],
) -> (StatusCode, Value) {
    let (multipart_type, body) = multipart(content_type, bytes);
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/upload")
        .header(header::AUTHORIZATION, format!("Bearer {}", session.token))
        .header(header::CONTENT_TYPE, multipart_type)
        .body(Body::from(body))
        .unwrap();
    let (status, bytes) = app.send(request).await;
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn small_expenses_auto_approve_without_policy() {
    let app = TestApp::new().await;
    let admin = app.register_company("Acme", "ada@acme.test").await;
    let employee = app.join(&admin.company_id, "bob@acme.test", "Sales").await;

    let small = app.submit(&employee, meal(49.99, "Cafe")).await;
    assert_eq!(small["status"], "approved");
    assert_eq!(small["approvedBy"], employee.user_id.as_str());
    assert_eq!(small["department"], "Sales");
    assert_eq!(small["currency"], "USD");

    let large = app.submit(&employee, meal(50.0, "Cafe")).await;
    assert_eq!(large["status"], "pending");
    assert!(large["approvedBy"].is_null());

    let (status, listed) = app.get("/api/v1/expenses?status=pending", &employee.token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn invalid_submissions_are_rejected() {
    let app = TestApp::new().await;
    let admin = app.register_company("Acme", "ada@acme.test").await;

    let (status, _) = app
        .post("/api/v1/expenses", &admin.token, meal(0.0, "Cafe"))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post("/api/v1/expenses", &admin.token, meal(12.0, "   "))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn manager_approves_department_expense_once() {
    let app = TestApp::new().await;
    let admin = app.register_company("Acme", "ada@acme.test").await;
    let employee = app.join(&admin.company_id, "bob@acme.test", "Sales").await;
    let manager = app
        .join_as(&admin, "mia@acme.test", "Sales", "manager")
        .await;
    let other_manager = app
        .join_as(&admin, "oli@acme.test", "Engineering", "manager")
        .await;

    let expense = app.submit(&employee, meal(64.0, "Bistro")).await;
    let id = expense["id"].as_str().unwrap();

    let (status, _) = app
        .post(
            &format!("/api/v1/expenses/{id}/approve"),
            &employee.token,
            json!({}),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .post(
            &format!("/api/v1/expenses/{id}/approve"),
            &other_manager.token,
            json!({}),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, approved) = app
        .post(
            &format!("/api/v1/expenses/{id}/approve"),
            &manager.token,
            json!({ "comments": "ok" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{approved}");
    assert_eq!(approved["status"], "approved");
    assert_eq!(approved["approvedBy"], manager.user_id.as_str());

    let (status, _) = app
        .post(
            &format!("/api/v1/expenses/{id}/approve"),
            &admin.token,
            json!({}),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, approvals) = app
        .get(&format!("/api/v1/expenses/{id}/approvals"), &employee.token)
        .await;
    assert_eq!(status, StatusCode::OK);
    let approvals = approvals.as_array().unwrap();
    assert_eq!(approvals.len(), 1);
    assert_eq!(approvals[0]["comments"], "ok");
}

#[tokio::test]
async fn rejection_requires_a_reason_and_blocks_self_review() {
    let app = TestApp::new().await;
    let admin = app.register_company("Acme", "ada@acme.test").await;
    let manager = app
        .join_as(&admin, "mia@acme.test", "Sales", "manager")
        .await;

    let own = app.submit(&manager, meal(80.0, "Steakhouse")).await;
    let id = own["id"].as_str().unwrap();

    let (status, _) = app
        .post(&format!("/api/v1/expenses/{id}/approve"), &manager.token, json!({}))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .post(
            &format!("/api/v1/expenses/{id}/reject"),
            &admin.token,
            json!({ "reason": "  " }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, rejected) = app
        .post(
            &format!("/api/v1/expenses/{id}/reject"),
            &admin.token,
            json!({ "reason": "personal dinner" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rejected["status"], "rejected");
    assert_eq!(rejected["rejectionReason"], "personal dinner");
}

#[tokio::test]
async fn only_open_expenses_can_be_edited_or_deleted() {
    let app = TestApp::new().await;
    let admin = app.register_company("Acme", "ada@acme.test").await;
    let employee = app.join(&admin.company_id, "bob@acme.test", "Sales").await;

    let approved = app.submit(&employee, meal(10.0, "Cafe")).await;
    let approved_id = approved["id"].as_str().unwrap();
    let (status, _) = app
        .delete(&format!("/api/v1/expenses/{approved_id}"), &employee.token)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = app
        .put(
            &format!("/api/v1/expenses/{approved_id}"),
            &employee.token,
            json!({ "vendor": "Other" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let pending = app.submit(&employee, meal(120.0, "Bistro")).await;
    let pending_id = pending["id"].as_str().unwrap();
    let (status, updated) = app
        .put(
            &format!("/api/v1/expenses/{pending_id}"),
            &employee.token,
            json!({ "description": "Client lunch" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["description"], "Client lunch");

    let (status, _) = app
        .delete(&format!("/api/v1/expenses/{pending_id}"), &employee.token)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app
        .get(&format!("/api/v1/expenses/{pending_id}"), &employee.token)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn companies_are_isolated() {
    let app = TestApp::new().await;
    let acme = app.register_company("Acme", "ada@acme.test").await;
    let globex = app.register_company("Globex", "hank@globex.test").await;
    let employee = app.join(&acme.company_id, "bob@acme.test", "Sales").await;

    let expense = app.submit(&employee, meal(75.0, "Bistro")).await;
    let id = expense["id"].as_str().unwrap();

    let (status, _) = app
        .get(&format!("/api/v1/expenses/{id}"), &globex.token)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app
        .post(&format!("/api/v1/expenses/{id}/approve"), &globex.token, json!({}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, listed) = app.get("/api/v1/expenses", &globex.token).await;
    assert_eq!(status, StatusCode::OK);
    assert!(listed.as_array().unwrap().is_empty());

    let (status, _) = app
        .get(&format!("/api/v1/users/{}", employee.user_id), &globex.token)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn blacklisted_vendor_is_flagged() {
    let app = TestApp::new().await;
    let admin = app.register_company("Acme", "ada@acme.test").await;
    let employee = app.join(&admin.company_id, "bob@acme.test", "Sales").await;

    let (status, policy) = app
        .post(
            "/api/v1/policies",
            &admin.token,
            json!({ "department": "Sales", "blacklistedVendors": ["Casino Royale"] }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{policy}");
    assert_eq!(policy["autoApproveLimit"], 100.0);

    let flagged = app.submit(&employee, meal(20.0, "casino royale")).await;
    assert_eq!(flagged["status"], "flagged");
    let violations = flagged["violations"].as_array().unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0]["severity"], "high");

    let (status, _) = app
        .post(
            "/api/v1/policies",
            &employee.token,
            json!({ "department": "Sales" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn approval_updates_budget_spend() {
    let app = TestApp::new().await;
    let admin = app.register_company("Acme", "ada@acme.test").await;
    let employee = app.join(&admin.company_id, "bob@acme.test", "Sales").await;
    let month_start = format!("{}01", &today()[..8]);

    let (status, budget) = app
        .post(
            "/api/v1/budgets",
            &admin.token,
            json!({
                "department": "Sales",
                "amount": 1000.0,
                "period": "monthly",
                "startDate": month_start,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{budget}");
    assert_eq!(budget["spent"], 0.0);
    let budget_id = budget["id"].as_str().unwrap();

    let expense = app.submit(&employee, meal(250.0, "Bistro")).await;
    let id = expense["id"].as_str().unwrap();
    let (status, _) = app
        .post(&format!("/api/v1/expenses/{id}/approve"), &admin.token, json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, budget) = app
        .get(&format!("/api/v1/budgets/{budget_id}"), &admin.token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(budget["spent"], 250.0);
    assert_eq!(budget["remaining"], 750.0);
    assert_eq!(budget["isOverBudget"], false);
}

#[tokio::test]
async fn dashboards_follow_role_and_vendors_need_staff() {
    let app = TestApp::new().await;
    let admin = app.register_company("Acme", "ada@acme.test").await;
    let employee = app.join(&admin.company_id, "bob@acme.test", "Sales").await;
    app.submit(&employee, meal(20.0, "Cafe")).await;
    app.submit(&employee, meal(30.0, "Cafe")).await;

    let (status, dashboard) = app.get("/api/v1/analytics/dashboard", &employee.token).await;
    assert_eq!(status, StatusCode::OK, "{dashboard}");

    let (status, dashboard) = app.get("/api/v1/analytics/dashboard", &admin.token).await;
    assert_eq!(status, StatusCode::OK, "{dashboard}");

    let (status, _) = app.get("/api/v1/vendors", &employee.token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, vendors) = app.get("/api/v1/vendors", &admin.token).await;
    assert_eq!(status, StatusCode::OK);
    let vendors = vendors.as_array().unwrap();
    assert_eq!(vendors.len(), 1);
    assert_eq!(vendors[0]["name"], "Cafe");
}

#[tokio::test]
async fn csv_export_downloads_visible_expenses() {
    let app = TestApp::new().await;
    let admin = app.register_company("Acme", "ada@acme.test").await;
    let employee = app.join(&admin.company_id, "bob@acme.test", "Sales").await;
    app.submit(&employee, meal(20.0, "Cafe")).await;

    let request = Request::builder()
        .uri("/api/v1/reports/expenses?format=csv")
        .header(header::AUTHORIZATION, format!("Bearer {}", admin.token))
        .body(Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(app.router.clone(), request)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/csv"));
    assert!(response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .starts_with("attachment"));

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    let mut lines = text.lines();
    assert!(lines.next().unwrap().starts_with("Date,Employee,"));
    assert!(lines.next().unwrap().contains("Cafe"));

    let (status, _) = app
        .get("/api/v1/reports/expenses?format=xlsx", &admin.token)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn receipts_upload_and_serve() {
    let app = TestApp::new().await;
    let admin = app.register_company("Acme", "ada@acme.test").await;

    let (status, body) = upload(&app, &admin, "image/png", b"\x89PNG fake image").await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let url = body["url"].as_str().unwrap();
    assert!(url.starts_with("/uploads/"));

    let (status, served) = app
        .send(Request::builder().uri(url).body(Body::empty()).unwrap())
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(served, b"\x89PNG fake image");

    let (status, _) = upload(&app, &admin, "text/plain", b"hello").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = upload(&app, &admin, "image/png", &[0u8; 2048]).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);

    let expense = app
        .submit(
            &admin,
            json!({
                "amount": 42.0,
                "category": "Office Supplies",
                "vendor": "Paper Co",
                "expenseDate": today(),
                "receiptUrl": url,
            }),
        )
        .await;
    assert_eq!(expense["receiptUrl"], url);
}
