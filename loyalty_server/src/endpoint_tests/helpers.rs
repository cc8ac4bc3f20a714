use actix_web::{
    http::{header::ContentType, StatusCode},
    test,
    test::TestRequest,
    web::ServiceConfig,
    App,
};
use chrono::{DateTime, TimeZone, Utc};
use log::debug;

use crate::routes::json_config;

pub const USER_HEADER: &str = "X-User-Id";

pub async fn get_request(
    user: Option<&str>,
    path: &str,
    configure: impl FnOnce(&mut ServiceConfig),
) -> (StatusCode, String) {
    send(with_user(TestRequest::get().uri(path), user), configure).await
}

pub async fn post_text(
    user: Option<&str>,
    path: &str,
    body: &str,
    configure: impl FnOnce(&mut ServiceConfig),
) -> (StatusCode, String) {
    let req = TestRequest::post().uri(path).insert_header(ContentType::plaintext()).set_payload(body.to_string());
    send(with_user(req, user), configure).await
}

pub async fn post_json(
    user: Option<&str>,
    path: &str,
    body: &str,
    configure: impl FnOnce(&mut ServiceConfig),
) -> (StatusCode, String) {
    let req = TestRequest::post().uri(path).insert_header(ContentType::json()).set_payload(body.to_string());
    send(with_user(req, user), configure).await
}

fn with_user(req: TestRequest, user: Option<&str>) -> TestRequest {
    match user {
        Some(user) => req.insert_header((USER_HEADER, user)),
        None => req,
    }
}

async fn send(req: TestRequest, configure: impl FnOnce(&mut ServiceConfig)) -> (StatusCode, String) {
    let app = App::new().app_data(json_config()).configure(configure);
    let service = test::init_service(app).await;
    debug!("Making request");
    let res = test::call_service(&service, req.to_request()).await;
    let status = res.status();
    let body = test::read_body(res).await;
    (status, String::from_utf8_lossy(&body).into_owned())
}

pub fn timestamp(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, hour, 30, 0).unwrap()
}
