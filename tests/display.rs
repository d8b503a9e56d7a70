use transferval::error::Error;
use transferval::link::resolve_detail_path;
use transferval::value::{clean_player_name, format_market_value};

#[test]
fn formats_millions_as_is() {
    assert_eq!(format_market_value(12.5).unwrap(), "€12.5 M");
    assert_eq!(format_market_value(200.0).unwrap(), "€200 M");
    assert_eq!(format_market_value(1.0).unwrap(), "€1 M");
}

#[test]
fn formats_sub_million_as_thousands() {
    assert_eq!(format_market_value(0.75).unwrap(), "€750 K");
    assert_eq!(format_market_value(0.5).unwrap(), "€500 K");
}

#[test]
fn zero_value_is_a_free_transfer() {
    assert_eq!(format_market_value(0.0).unwrap(), "Free Transfer");
}

#[test]
fn rejects_negative_and_nan_values() {
    assert!(matches!(
        format_market_value(-3.0),
        Err(Error::InvalidValue(_))
    ));
    assert!(matches!(
        format_market_value(f64::NAN),
        Err(Error::InvalidValue(_))
    ));
}

#[test]
fn strips_duplicate_suffix_from_names() {
    assert_eq!(clean_player_name("Danny Ward|2"), "Danny Ward");
    assert_eq!(clean_player_name("Jude Bellingham"), "Jude Bellingham");
}

#[test]
fn name_cleaning_is_idempotent() {
    let once = clean_player_name("Danny Ward|2");
    assert_eq!(clean_player_name(once), once);
}

#[test]
fn resolves_profile_links_to_query_paths() {
    assert_eq!(
        resolve_detail_path("/players/42/profile").unwrap(),
        "/42|profile"
    );
    assert_eq!(
        resolve_detail_path("/players/42/profile/stats").unwrap(),
        "/42|profile|stats"
    );
}

#[test]
fn link_resolution_is_deterministic() {
    let first = resolve_detail_path("/players/42/profile").unwrap();
    let second = resolve_detail_path("/players/42/profile").unwrap();
    assert_eq!(first, second);
}

#[test]
fn rejects_links_with_too_few_segments() {
    assert!(matches!(
        resolve_detail_path("/onlyonesegment"),
        Err(Error::MalformedLink(_))
    ));
    assert!(matches!(resolve_detail_path(""), Err(Error::MalformedLink(_))));
    assert!(matches!(
        resolve_detail_path("///"),
        Err(Error::MalformedLink(_))
    ));
}
