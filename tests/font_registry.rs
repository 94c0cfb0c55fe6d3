//! The process-wide font families can only be set once, so this runs in its
//! own test binary.

use styledtext::fonts::{font_families, init_font_families, FontFamilies};
use styledtext::{parse, AttributeSet, Error};

#[test]
fn test_font_registry() {
    init_font_families(FontFamilies::new(["Corporate Sans", "DejaVu Serif"])).unwrap();
    assert!(matches!(
        init_font_families(FontFamilies::new(["Other"])),
        Err(Error::FontFamiliesInitialized)
    ));

    let fonts = font_families();
    assert_eq!(fonts.len(), 2);
    assert!(fonts.contains("DejaVu Serif"));
    assert!(!fonts.contains("Other"));

    let text = parse(
        &AttributeSet::new(),
        "<font face=\"Missing, Corporate Sans\">x</font><font face=\"Missing\">y</font>",
        None,
    )
    .unwrap();
    assert_eq!(text.attributes_at(0).family.as_deref(), Some("Corporate Sans"));
    assert_eq!(text.attributes_at(1).family, None);
}
