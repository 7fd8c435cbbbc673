use super::*;

#[test]
fn image_url_joins_static_path() {
    assert_eq!(image_url("http://h:5000/", "a.png"), "http://h:5000/static/uploads/a.png");
    assert_eq!(image_url("", "a.png"), "/static/uploads/a.png");
}

#[test]
fn upload_without_name_is_validation_failure() {
    let err = ImageUpload::new("  ", vec![1]).validate().unwrap_err();
    assert_eq!(err, GatewayError::Validation("no file selected".into()));
}

#[test]
fn upload_without_bytes_is_validation_failure() {
    let err = ImageUpload::new("a.png", Vec::new()).validate().unwrap_err();
    assert!(matches!(err, GatewayError::Validation(msg) if msg.contains("a.png")));
}

#[test]
fn upload_with_content_is_valid() {
    assert!(ImageUpload::new("a.png", vec![0x89, b'P', b'N', b'G']).validate().is_ok());
}

#[test]
fn error_codes_are_distinct() {
    let errors = [
        GatewayError::Network("x".into()),
        GatewayError::Server { status: 500, message: "x".into() },
        GatewayError::NotFound,
        GatewayError::Validation("x".into()),
        GatewayError::Decode("x".into()),
        GatewayError::ClientBuild("x".into()),
    ];
    let mut codes: Vec<&str> = errors.iter().map(GatewayError::error_code).collect();
    codes.sort_unstable();
    codes.dedup();
    assert_eq!(codes.len(), errors.len());
}

#[test]
fn server_error_display_includes_status_and_message() {
    let err = GatewayError::Server { status: 401, message: "Not authenticated".into() };
    assert_eq!(err.to_string(), "server error 401: Not authenticated");
}
