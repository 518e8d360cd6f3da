//! Surface encode/decode through the filesystem.

use lumen::{Color, Surface};

#[test]
fn png_save_and_load_preserves_pixels() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("out.png");

    let mut s = Surface::new(3, 2).unwrap();
    s.set_pixel(0, 0, Color::RED);
    s.set_pixel(2, 1, Color::rgba(10, 20, 30, 40));
    s.save(&path).unwrap();

    let back = Surface::load(&path).unwrap();
    assert_eq!((back.width(), back.height()), (3, 2));
    assert_eq!(back.as_bytes(), s.as_bytes());
}

#[test]
fn loading_missing_file_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    assert!(Surface::load(dir.path().join("nope.png")).is_err());
}
