use super::*;

#[test]
fn default_style_is_valid() {
    StrokeStyle::default().validate().unwrap();
}

#[test]
fn zero_or_nan_width_is_rejected() {
    let style = StrokeStyle {
        width: 0.0,
        ..StrokeStyle::default()
    };
    assert!(matches!(
        style.validate(),
        Err(WavyteError::Validation(_))
    ));

    let style = StrokeStyle {
        width: f64::NAN,
        ..StrokeStyle::default()
    };
    assert!(style.validate().is_err());
}

#[test]
fn negative_dilate_is_rejected() {
    let style = StrokeStyle {
        dilate: -0.5,
        ..StrokeStyle::default()
    };
    assert!(style.validate().is_err());
}

#[test]
fn caps_are_skipped_for_single_sided_strokes() {
    let mut style = StrokeStyle::default();
    assert!(style.draws_caps());
    style.single_sided = true;
    assert!(!style.draws_caps());
    style.single_sided = false;
    style.has_linecap = false;
    assert!(!style.draws_caps());
}

#[test]
fn uniforms_require_unit_winding_sign() {
    let style = StrokeStyle {
        width: -0.5,
        ..StrokeStyle::default()
    };
    let camera = Camera::default();
    assert!(DrawUniforms::new(&style, &camera, 0.0).is_err());
    let u = DrawUniforms::new(&style, &camera, -1.0).unwrap();
    assert_eq!(u.half_width(), 0.5);
}
