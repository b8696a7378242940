use super::*;
use serde_json::json;

#[test]
fn parses_hex_rgb_and_rgba() {
    let c: Rgba = serde_json::from_value(json!("#ff0000")).unwrap();
    assert_eq!(c, Rgba::new(1.0, 0.0, 0.0, 1.0));

    let c: Rgba = serde_json::from_value(json!("#0000ff80")).unwrap();
    assert!((c.b - 1.0).abs() < 1e-6);
    assert!((c.a - (128.0 / 255.0)).abs() < 1e-6);
}

#[test]
fn parses_rgba_object_and_array() {
    let c: Rgba = serde_json::from_value(json!({"r": 0.25, "g": 0.5, "b": 0.75})).unwrap();
    assert_eq!(c, Rgba::new(0.25, 0.5, 0.75, 1.0));

    let c: Rgba = serde_json::from_value(json!([0.25, 0.5, 0.75, 0.9])).unwrap();
    assert_eq!(c, Rgba::new(0.25, 0.5, 0.75, 0.9));
}

#[test]
fn rejects_malformed_colors() {
    assert!(serde_json::from_value::<Rgba>(json!("#12345")).is_err());
    assert!(serde_json::from_value::<Rgba>(json!("#gg0000")).is_err());
    assert!(serde_json::from_value::<Rgba>(json!([0.1, 0.2])).is_err());
}
