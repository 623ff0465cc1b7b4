#[test]
fn serialize_deserialize_selection_settings() {
    let settings = raster_select::SelectionSettings::default();
    let serialized = serde_json::to_string(&settings).unwrap();
    let deserialized: raster_select::SelectionSettings = serde_json::from_str(&serialized).unwrap();
    assert_eq!(settings, deserialized);
}

#[test]
fn deserialize_tagged_modes() {
    let algorithm: raster_select::RegionAlgorithm = serde_json::from_str(r#""color_wand""#).unwrap();
    assert_eq!(algorithm, raster_select::RegionAlgorithm::ColorWand);
    let policy: raster_select::AccumulationPolicy = serde_json::from_str(r#""remove""#).unwrap();
    assert_eq!(policy, raster_select::AccumulationPolicy::Remove);
    let geometry: raster_select::Geometry =
        serde_json::from_str(r#"{ "rect": { "start": [0.0, 1.0], "end": [2.0, 3.0] } }"#).unwrap();
    assert_eq!(
        geometry,
        raster_select::Geometry::Rect {
            start: [0.0, 1.0],
            end: [2.0, 3.0]
        }
    );
}
