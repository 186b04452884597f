use objinv::data_object::LineMode;
use objinv::inventory::Inventory;

const PLAINTEXT: &[u8] = b"# Sphinx inventory version 2\n\
# Project: demo\n\
# Version: 1.0\n\
# The remainder of this file is compressed using zlib.\n\
demo.Widget py:class 1 api.html#$ -\n\
demo.Widget.render py:method 1 api.html#$ -\n\
demo.helpers py:module 1 api.html#demo.helpers Helper utilities\n";

#[test]
fn round_trips_through_zlib_and_back() {
    let inventory = Inventory::from_bytes_plaintext(PLAINTEXT).unwrap();
    assert_eq!(inventory.count(), 3);

    let rendered = inventory.data_file(LineMode::AsIs).unwrap();
    let compressed = objinv::codec::compress(rendered.as_bytes()).unwrap();

    let reconstructed = Inventory::from_bytes_zlib(&compressed).unwrap();
    assert_eq!(reconstructed.count(), inventory.count());
    assert_eq!(reconstructed.project.as_deref(), Some("demo"));
    assert_eq!(reconstructed.version.as_deref(), Some("1.0"));
}

#[test]
fn round_trips_through_json_dict() {
    let inventory = Inventory::from_bytes_plaintext(PLAINTEXT).unwrap();
    let dict = inventory.json_dict(LineMode::Expand);

    let reconstructed = Inventory::from_dict_json(&dict, true).unwrap();
    assert_eq!(reconstructed.count(), inventory.count());

    let widget = &reconstructed.objects[0];
    assert_eq!(widget.uri, "api.html#demo.Widget");
}

#[test]
fn round_trips_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let plain_path = dir.path().join("objects.txt");
    let zlib_path = dir.path().join("objects.inv");

    objinv::fileops::writebytes(&plain_path, PLAINTEXT).unwrap();
    let inventory = Inventory::from_file_plaintext(&plain_path).unwrap();

    let compressed = objinv::codec::compress(
        inventory
            .data_file(LineMode::AsIs)
            .unwrap()
            .as_bytes(),
    )
    .unwrap();
    objinv::fileops::writebytes(&zlib_path, &compressed).unwrap();

    let reloaded = Inventory::from_file_zlib(&zlib_path).unwrap();
    assert_eq!(reloaded.count(), 3);
}

#[test]
fn suggest_finds_the_closest_reference() {
    let inventory = Inventory::from_bytes_plaintext(PLAINTEXT).unwrap();
    let results = inventory.suggest("Widget render", false, false);
    assert_eq!(results[0].reference(), ":py:method:`demo.Widget.render`");
}

#[test]
fn builder_rejects_multiple_sources() {
    use objinv::inventory::InventoryBuilder;

    let err = InventoryBuilder::new()
        .plaintext(PLAINTEXT)
        .zlib(b"irrelevant")
        .build()
        .unwrap_err();
    assert!(matches!(
        err,
        objinv::error::InventoryError::MultipleSourcesError
    ));
}
