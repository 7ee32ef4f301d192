// Unit tests for HttpStatusCode range predicates

use crate::http_status::HttpStatusCode;

#[test]
fn given_status_ranges_when_classified_then_predicates_match() {
    assert!(HttpStatusCode(200).is_success());
    assert!(HttpStatusCode(204).is_success());
    assert!(!HttpStatusCode(301).is_success());

    assert!(HttpStatusCode(404).is_client_error());
    assert!(!HttpStatusCode(404).is_server_error());

    assert!(HttpStatusCode(503).is_server_error());
    assert!(!HttpStatusCode(503).is_client_error());
}

#[test]
fn given_u16_when_converted_then_displays_bare_code() {
    let status = HttpStatusCode::from(418);
    assert_eq!(format!("{}", status), "418");
}
