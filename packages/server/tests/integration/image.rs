use crate::common::{TEST_IMAGE, TestApp, routes};

#[tokio::test]
async fn serves_stored_bytes_with_guessed_content_type() {
    let app = TestApp::spawn().await;
    let created = app.create_photo().await;
    let filename = created["filename"].as_str().unwrap();

    let res = app.get_raw(&routes::image(filename)).await;

    assert_eq!(res.status().as_u16(), 200);
    assert_eq!(
        res.headers()[reqwest::header::CONTENT_TYPE].to_str().unwrap(),
        "image/jpeg"
    );
    assert_eq!(
        res.headers()[reqwest::header::CONTENT_LENGTH].to_str().unwrap(),
        TEST_IMAGE.len().to_string()
    );
    let bytes = res.bytes().await.unwrap();
    assert_eq!(bytes.as_ref(), TEST_IMAGE);
}

#[tokio::test]
async fn missing_image_returns_404() {
    let app = TestApp::spawn().await;

    let res = app.get(&routes::image("upload-missing.jpg")).await;

    assert_eq!(res.status, 404);
    assert_eq!(res.error(), "Image not found");
}

#[tokio::test]
async fn deleted_photo_image_is_no_longer_served() {
    let app = TestApp::spawn().await;
    let created = app.create_photo().await;
    let filename = created["filename"].as_str().unwrap();

    assert_eq!(app.delete(&routes::photo(1)).await.status, 200);

    let res = app.get(&routes::image(filename)).await;
    assert_eq!(res.status, 404);
}

#[tokio::test]
async fn names_escaping_the_image_directory_are_rejected() {
    let app = TestApp::spawn().await;
    // The database file sits one level above the image directory.
    assert!(app.dir.path().join("photos.db").exists());

    for name in ["..%2Fphotos.db", ".tmp"] {
        let res = app.get(&routes::image(name)).await;
        assert_eq!(res.status, 404, "name {name}");
        assert_eq!(res.error(), "Image not found");
    }
}
