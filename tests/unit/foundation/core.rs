use super::*;

#[test]
fn canvas_rejects_zero_extent() {
    assert!(Canvas::new(0, 4).is_err());
    assert!(Canvas::new(4, 0).is_err());
    assert_eq!(Canvas::new(4, 3).unwrap().pixel_count(), 12);
}

#[test]
fn straight_to_premul_matches_u8_path() {
    let c = Rgba::new(1.0, 0.5, 0.0, 0.5).to_rgba8_premul();
    assert_eq!(c.a, 128);
    assert_eq!(c.r, 128);
    assert_eq!(c.b, 0);

    let clear = Rgba::new(1.0, 1.0, 1.0, 0.0).to_rgba8_premul();
    assert_eq!(clear, Rgba8Premul::transparent());
}

#[test]
fn max_is_per_channel() {
    let a = Rgba::new(0.2, 0.9, 0.1, 0.4);
    let b = Rgba::new(0.8, 0.1, 0.1, 0.6);
    assert_eq!(a.max(b), Rgba::new(0.8, 0.9, 0.1, 0.6));
    assert_eq!(a.max(b), b.max(a));
}
