//! 画像登録フローのテスト
//!
//! モックAPI・モック画像ホストで、検証 → アップロード → 登録 の流れを確認

use gallery_common::{
    Cursor, Error, Field, Gallery, GalleryEvent, Image, ImageApi, ImageHost, NewImage,
    Notification, Page, Result, SubmitOutcome,
};
use gallery_rust::scanner::LocalImage;
use gallery_rust::upload::{report_outcome, run_upload, UploadRequest};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Default)]
struct MockApi {
    posts: RefCell<Vec<NewImage>>,
    fail_post: bool,
}

impl ImageApi for MockApi {
    async fn fetch_page(&self, _cursor: Option<Cursor>) -> Result<Page> {
        Ok(Page::default())
    }

    async fn create_image(&self, new_image: &NewImage) -> Result<Image> {
        self.posts.borrow_mut().push(new_image.clone());
        if self.fail_post {
            return Err(Error::http(503, "Service Unavailable"));
        }
        Ok(Image {
            id: "new-id".to_string(),
            title: new_image.title.clone(),
            description: new_image.description.clone(),
            url: new_image.url.clone(),
            ts: 0,
        })
    }
}

struct MockHost {
    url: Option<&'static str>,
    uploads: Cell<usize>,
}

impl MockHost {
    fn ok() -> Self {
        Self { url: Some("https://i.ibb.co/x/sunset.png"), uploads: Cell::new(0) }
    }

    fn failing() -> Self {
        Self { url: None, uploads: Cell::new(0) }
    }
}

impl ImageHost for MockHost {
    type Payload = Vec<u8>;

    async fn upload(&self, _payload: Vec<u8>) -> Result<String> {
        self.uploads.set(self.uploads.get() + 1);
        self.url
            .map(str::to_string)
            .ok_or_else(|| Error::http(400, "Bad Request"))
    }
}

fn local_image(size: u64, mime: &str) -> LocalImage {
    LocalImage {
        meta: gallery_common::FileMeta {
            name: "sunset.png".to_string(),
            size,
            mime: mime.to_string(),
        },
        bytes: vec![0; 16],
    }
}

fn request(title: &str, image: LocalImage) -> UploadRequest {
    UploadRequest {
        title: title.to_string(),
        description: "海辺の夕焼け".to_string(),
        image,
    }
}

fn count_invalidations(gallery: &Gallery<MockApi>) -> Rc<Cell<usize>> {
    let count = Rc::new(Cell::new(0));
    let counter = count.clone();
    gallery.subscribe(move |event| {
        if matches!(event, GalleryEvent::Invalidated) {
            counter.set(counter.get() + 1);
        }
    });
    count
}

#[tokio::test]
async fn test_upload_success_posts_once_and_invalidates() {
    let gallery = Gallery::new(MockApi::default());
    let invalidations = count_invalidations(&gallery);
    let host = MockHost::ok();

    let outcome = run_upload(&gallery, &host, request("夕焼け", local_image(1024, "image/png"))).await;

    assert!(matches!(outcome, SubmitOutcome::Created { .. }));
    assert!(report_outcome(&outcome));
    assert_eq!(host.uploads.get(), 1);
    assert_eq!(gallery.api().posts.borrow().len(), 1);
    assert_eq!(gallery.api().posts.borrow()[0].url, "https://i.ibb.co/x/sunset.png");
    assert_eq!(invalidations.get(), 1);
}

#[tokio::test]
async fn test_host_failure_rejects_without_post() {
    let gallery = Gallery::new(MockApi::default());
    let invalidations = count_invalidations(&gallery);
    let host = MockHost::failing();

    let outcome = run_upload(&gallery, &host, request("夕焼け", local_image(1024, "image/png"))).await;

    assert_eq!(outcome, SubmitOutcome::Rejected(Notification::image_not_added()));
    assert!(!report_outcome(&outcome));
    assert!(gallery.api().posts.borrow().is_empty());
    assert_eq!(invalidations.get(), 0);
}

#[tokio::test]
async fn test_invalid_file_skips_host_and_post() {
    let gallery = Gallery::new(MockApi::default());
    let host = MockHost::ok();

    let outcome = run_upload(&gallery, &host, request("夕焼け", local_image(12_000_000, "image/png"))).await;

    match outcome {
        SubmitOutcome::Invalid(errors) => {
            assert_eq!(errors.get(Field::Image), Some("ファイルは10MB未満にしてください"));
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert_eq!(host.uploads.get(), 0);
    assert!(gallery.api().posts.borrow().is_empty());
}

#[tokio::test]
async fn test_invalid_title_blocks_post() {
    let gallery = Gallery::new(MockApi::default());
    let host = MockHost::ok();

    let outcome = run_upload(&gallery, &host, request("A", local_image(1024, "image/gif"))).await;

    match outcome {
        SubmitOutcome::Invalid(errors) => {
            assert_eq!(errors.len(), 1);
            assert!(errors.get(Field::Title).is_some());
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert!(gallery.api().posts.borrow().is_empty());
}

#[tokio::test]
async fn test_post_failure_reports_error() {
    let gallery = Gallery::new(MockApi { fail_post: true, ..Default::default() });
    let invalidations = count_invalidations(&gallery);
    let host = MockHost::ok();

    let outcome = run_upload(&gallery, &host, request("夕焼け", local_image(1024, "image/jpeg"))).await;

    match &outcome {
        SubmitOutcome::Failed(notification) => {
            assert!(notification.is_error());
            assert!(notification.description.contains("503"));
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert!(!report_outcome(&outcome));
    assert_eq!(gallery.api().posts.borrow().len(), 1);
    assert_eq!(invalidations.get(), 0);
}
