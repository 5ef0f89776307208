//! ページング層（無限スクロール用クエリ）
//!
//! `Gallery` は `ImageApi` をカーソル単位で呼び出し、取得したページを
//! `PageCache` に積み上げる。表示側は `subscribe` で変更通知を受け取り、
//! `snapshot()` の内容で再描画する。
//!
//! シングルスレッド前提（Web: `spawn_local`、CLI: メインタスク）で、
//! 状態は `RefCell` に持つ。`.await` をまたいで借用しないよう、
//! 取得は `begin_fetch` / `finish_fetch` に分かれている。
//! 取得中に次の取得要求が来ても無視する（キューイングもキャンセルもしない）。

use crate::api::ImageApi;
use crate::cache::PageCache;
use crate::error::Result;
use crate::types::{Cursor, Image, Page};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing::{debug, warn};

/// 読み込み状態
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GalleryStatus {
    #[default]
    Idle,
    /// 先頭ページを読み込み中
    LoadingFirst,
    /// 2ページ目以降を読み込み中
    LoadingMore,
    /// 直近の取得に失敗（自動リトライはしない）
    LoadFailed(String),
}

/// 表示用のスナップショット
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GallerySnapshot {
    pub items: Vec<Image>,
    pub has_more: bool,
    pub status: GalleryStatus,
}

impl GallerySnapshot {
    pub fn is_loading_first(&self) -> bool {
        self.status == GalleryStatus::LoadingFirst
    }

    pub fn is_loading_more(&self) -> bool {
        self.status == GalleryStatus::LoadingMore
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            GalleryStatus::LoadFailed(message) => Some(message),
            _ => None,
        }
    }
}

/// 購読者への通知
#[derive(Debug, Clone)]
pub enum GalleryEvent {
    Changed(GallerySnapshot),
    /// キャッシュが破棄された（先頭から再取得が必要）
    Invalidated,
}

/// `subscribe` の戻り値（購読解除に使う）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// 実行中の取得を表すチケット
#[derive(Debug)]
pub struct FetchTicket {
    id: u64,
    cursor: Option<Cursor>,
    generation: u64,
}

impl FetchTicket {
    pub fn cursor(&self) -> Option<Cursor> {
        self.cursor
    }
}

#[derive(Debug, Default)]
struct GalleryState {
    cache: PageCache,
    status: GalleryStatus,
    in_flight: Option<u64>,
    next_ticket: u64,
    /// 無効化時に取得中だった。その取得が終わってから `Invalidated` を通知する
    invalidation_pending: bool,
}

type Observer = Rc<dyn Fn(&GalleryEvent)>;

/// カーソル方式の無限ページング
pub struct Gallery<A> {
    api: A,
    state: RefCell<GalleryState>,
    observers: RefCell<Vec<(SubscriptionId, Observer)>>,
    next_subscription: Cell<u64>,
}

impl<A: ImageApi> Gallery<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: RefCell::new(GalleryState::default()),
            observers: RefCell::new(Vec::new()),
            next_subscription: Cell::new(0),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// 取得済みページを連結した一覧
    pub fn items(&self) -> Vec<Image> {
        self.state.borrow().cache.items()
    }

    /// 最後に取得したページに次カーソルがあったか
    pub fn has_more(&self) -> bool {
        self.state.borrow().cache.has_more()
    }

    pub fn is_loading_first(&self) -> bool {
        self.state.borrow().status == GalleryStatus::LoadingFirst
    }

    pub fn is_loading_more(&self) -> bool {
        self.state.borrow().status == GalleryStatus::LoadingMore
    }

    pub fn is_fetching(&self) -> bool {
        self.state.borrow().in_flight.is_some()
    }

    pub fn error(&self) -> Option<String> {
        match &self.state.borrow().status {
            GalleryStatus::LoadFailed(message) => Some(message.clone()),
            _ => None,
        }
    }

    pub fn status(&self) -> GalleryStatus {
        self.state.borrow().status.clone()
    }

    pub fn page_count(&self) -> usize {
        self.state.borrow().cache.len()
    }

    pub fn snapshot(&self) -> GallerySnapshot {
        let state = self.state.borrow();
        GallerySnapshot {
            items: state.cache.items(),
            has_more: state.cache.has_more(),
            status: state.status.clone(),
        }
    }

    /// 先頭ページが未取得なら取得する
    ///
    /// 取得した場合は `Ok(true)`、キャッシュ済みまたは取得中なら `Ok(false)`。
    pub async fn load_first(&self) -> Result<bool> {
        if !self.state.borrow().cache.is_empty() {
            return Ok(false);
        }
        Ok(self.get_or_fetch(None).await?.is_some())
    }

    /// 次のページを取得する
    ///
    /// 次ページが無い、または取得中なら何もせず `Ok(false)`。
    pub async fn load_more(&self) -> Result<bool> {
        let next = {
            let state = self.state.borrow();
            if state.in_flight.is_some() {
                debug!("取得中のため load_more を無視");
                return Ok(false);
            }
            state.cache.next_cursor()
        };

        match next {
            Some(cursor) => Ok(self.get_or_fetch(Some(cursor)).await?.is_some()),
            None => Ok(false),
        }
    }

    /// キャッシュ済みならそのページを、無ければ取得して返す
    ///
    /// 他の取得が実行中の場合や、取得中にキャッシュが無効化された場合は `Ok(None)`。
    pub async fn get_or_fetch(&self, cursor: Option<Cursor>) -> Result<Option<Page>> {
        if let Some(page) = self.state.borrow().cache.get(cursor) {
            return Ok(Some(page.clone()));
        }

        let Some(ticket) = self.begin_fetch(cursor) else {
            return Ok(None);
        };
        let result = self.api.fetch_page(cursor).await;
        self.finish_fetch(ticket, result)
    }

    /// 取得開始を記録する。既に取得中なら `None`
    pub fn begin_fetch(&self, cursor: Option<Cursor>) -> Option<FetchTicket> {
        let ticket = {
            let mut state = self.state.borrow_mut();
            if state.in_flight.is_some() {
                return None;
            }

            state.next_ticket += 1;
            let id = state.next_ticket;
            state.in_flight = Some(id);
            state.status = if state.cache.is_empty() {
                GalleryStatus::LoadingFirst
            } else {
                GalleryStatus::LoadingMore
            };

            FetchTicket {
                id,
                cursor,
                generation: state.cache.generation(),
            }
        };

        debug!(cursor = ?ticket.cursor, "ページ取得開始");
        self.notify_changed();
        Some(ticket)
    }

    /// 取得結果を反映する
    pub fn finish_fetch(&self, ticket: FetchTicket, result: Result<Page>) -> Result<Option<Page>> {
        let outcome = {
            let mut state = self.state.borrow_mut();
            if state.in_flight == Some(ticket.id) {
                state.in_flight = None;
            }

            if ticket.generation != state.cache.generation() {
                debug!(cursor = ?ticket.cursor, "無効化前の取得結果を破棄");
                let resume = state.in_flight.is_none() && state.invalidation_pending;
                if resume {
                    state.invalidation_pending = false;
                    state.status = GalleryStatus::Idle;
                }
                drop(state);

                if resume {
                    self.emit(&GalleryEvent::Invalidated);
                    self.notify_changed();
                }
                return Ok(None);
            }

            match result {
                Ok(page) => {
                    debug!(
                        cursor = ?ticket.cursor,
                        items = page.items.len(),
                        next = ?page.next_cursor,
                        "ページ取得完了"
                    );
                    state.cache.insert(ticket.cursor, page.clone());
                    state.status = GalleryStatus::Idle;
                    Ok(Some(page))
                }
                Err(e) => {
                    warn!(cursor = ?ticket.cursor, error = %e, "ページ取得失敗");
                    state.status = GalleryStatus::LoadFailed(e.to_string());
                    Err(e)
                }
            }
        };

        self.notify_changed();
        outcome
    }

    /// キャッシュを破棄する。次回表示時に先頭ページから取得し直す
    ///
    /// 取得中だった場合、その結果は捨てられ、`Invalidated` の通知は
    /// 取得が終わるまで遅らせる（同時に2件の取得を走らせないため）。
    pub fn invalidate(&self) {
        let emit_now = {
            let mut state = self.state.borrow_mut();
            state.cache.invalidate();
            if state.in_flight.is_some() {
                state.invalidation_pending = true;
                state.status = GalleryStatus::LoadingFirst;
                false
            } else {
                state.status = GalleryStatus::Idle;
                true
            }
        };

        if emit_now {
            debug!("ギャラリーのキャッシュを無効化");
            self.emit(&GalleryEvent::Invalidated);
        } else {
            debug!("ギャラリーのキャッシュを無効化（取得中のため再取得は完了後）");
        }
        self.notify_changed();
    }

    /// 変更通知を購読する
    pub fn subscribe(&self, observer: impl Fn(&GalleryEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.get());
        self.next_subscription.set(id.0 + 1);
        self.observers.borrow_mut().push((id, Rc::new(observer)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.observers.borrow_mut().retain(|(sid, _)| *sid != id);
    }

    fn notify_changed(&self) {
        let snapshot = self.snapshot();
        self.emit(&GalleryEvent::Changed(snapshot));
    }

    fn emit(&self, event: &GalleryEvent) {
        // 購読者が Gallery を参照できるよう、呼び出し前に借用を解放する
        let observers: Vec<Observer> = self
            .observers
            .borrow()
            .iter()
            .map(|(_, observer)| observer.clone())
            .collect();
        for observer in observers {
            observer(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::types::NewImage;
    use std::collections::VecDeque;

    /// 呼び出し回数を記録するモックAPI
    #[derive(Default)]
    struct MockApi {
        pages: RefCell<VecDeque<Result<Page>>>,
        calls: RefCell<Vec<Option<Cursor>>>,
    }

    impl MockApi {
        fn with_pages(pages: Vec<Result<Page>>) -> Self {
            Self {
                pages: RefCell::new(pages.into()),
                calls: RefCell::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.borrow().len()
        }
    }

    impl ImageApi for MockApi {
        async fn fetch_page(&self, cursor: Option<Cursor>) -> Result<Page> {
            self.calls.borrow_mut().push(cursor);
            tokio::task::yield_now().await;
            self.pages
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Ok(Page::default()))
        }

        async fn create_image(&self, _new_image: &NewImage) -> Result<Image> {
            unreachable!("not used by pagination tests")
        }
    }

    fn image(id: &str) -> Image {
        Image {
            id: id.to_string(),
            title: id.to_uppercase(),
            description: String::new(),
            url: format!("https://i.ibb.co/{}.jpg", id),
            ts: 0,
        }
    }

    fn page(ids: &[&str], next: Option<u64>) -> Result<Page> {
        Ok(Page {
            items: ids.iter().map(|id| image(id)).collect(),
            next_cursor: next.map(Cursor),
        })
    }

    fn ids(gallery: &Gallery<MockApi>) -> Vec<String> {
        gallery.items().into_iter().map(|i| i.id).collect()
    }

    #[tokio::test]
    async fn test_flattened_items_follow_fetch_order() {
        let api = MockApi::with_pages(vec![
            page(&["3", "1"], Some(10)),
            page(&["2"], Some(20)),
            page(&["5", "4"], None),
        ]);
        let gallery = Gallery::new(api);

        assert!(gallery.load_first().await.unwrap());
        assert!(gallery.load_more().await.unwrap());
        assert!(gallery.load_more().await.unwrap());

        assert_eq!(ids(&gallery), vec!["3", "1", "2", "5", "4"]);
        assert_eq!(
            *gallery.api().calls.borrow(),
            vec![None, Some(Cursor(10)), Some(Cursor(20))]
        );
    }

    #[tokio::test]
    async fn test_has_more_tracks_last_cursor() {
        let api = MockApi::with_pages(vec![page(&["a"], Some(1)), page(&["b"], None)]);
        let gallery = Gallery::new(api);

        assert!(!gallery.has_more());
        gallery.load_first().await.unwrap();
        assert!(gallery.has_more());
        gallery.load_more().await.unwrap();
        assert!(!gallery.has_more());

        // 次ページが無ければ何もしない
        assert!(!gallery.load_more().await.unwrap());
        assert_eq!(gallery.api().call_count(), 2);
    }

    #[tokio::test]
    async fn test_load_more_while_pending_issues_one_call() {
        let api = MockApi::with_pages(vec![page(&["a"], Some(1)), page(&["b"], Some(2))]);
        let gallery = Gallery::new(api);
        gallery.load_first().await.unwrap();

        let (first, second) = tokio::join!(gallery.load_more(), gallery.load_more());

        assert!(first.unwrap());
        assert!(!second.unwrap());
        assert_eq!(gallery.api().call_count(), 2);
        assert_eq!(ids(&gallery), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_load_first_is_cached() {
        let api = MockApi::with_pages(vec![page(&["a"], None)]);
        let gallery = Gallery::new(api);

        assert!(gallery.load_first().await.unwrap());
        assert!(!gallery.load_first().await.unwrap());
        assert_eq!(gallery.api().call_count(), 1);
    }

    #[tokio::test]
    async fn test_fetch_failure_sets_load_failed_and_keeps_pages() {
        let api = MockApi::with_pages(vec![
            page(&["a"], Some(1)),
            Err(Error::http(500, "Internal Server Error")),
            page(&["b"], None),
        ]);
        let gallery = Gallery::new(api);
        gallery.load_first().await.unwrap();

        let result = gallery.load_more().await;
        assert!(matches!(result, Err(Error::Http { status: 500, .. })));
        assert!(gallery.error().unwrap().contains("500"));
        assert_eq!(ids(&gallery), vec!["a"]);
        assert!(gallery.has_more());

        // 再度の load_more はユーザー操作による再試行
        assert!(gallery.load_more().await.unwrap());
        assert_eq!(gallery.error(), None);
        assert_eq!(ids(&gallery), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_first_page_failure() {
        let api = MockApi::with_pages(vec![Err(Error::Network("offline".to_string()))]);
        let gallery = Gallery::new(api);

        assert!(gallery.load_first().await.is_err());
        assert!(matches!(gallery.status(), GalleryStatus::LoadFailed(_)));
        assert!(gallery.items().is_empty());
    }

    #[tokio::test]
    async fn test_invalidate_refetches_from_start() {
        let api = MockApi::with_pages(vec![
            page(&["a"], Some(1)),
            page(&["new", "a"], Some(1)),
        ]);
        let gallery = Gallery::new(api);
        gallery.load_first().await.unwrap();

        gallery.invalidate();
        assert!(gallery.items().is_empty());
        assert!(!gallery.has_more());

        assert!(gallery.load_first().await.unwrap());
        assert_eq!(ids(&gallery), vec!["new", "a"]);
        assert_eq!(*gallery.api().calls.borrow(), vec![None, None]);
    }

    #[tokio::test]
    async fn test_invalidate_discards_in_flight_result() {
        let api = MockApi::with_pages(vec![page(&["a"], Some(1))]);
        let gallery = Gallery::new(api);

        let ticket = gallery.begin_fetch(None).expect("ticket");
        gallery.invalidate();
        let result = gallery.finish_fetch(ticket, page(&["stale"], None));

        assert!(matches!(result, Ok(None)));
        assert!(gallery.items().is_empty());
        assert!(!gallery.is_fetching());
    }

    #[tokio::test]
    async fn test_invalidate_during_load_more_defers_refetch() {
        let api = MockApi::with_pages(vec![
            page(&["a"], Some(1)),
            page(&["stale"], None),
            page(&["new", "a"], Some(1)),
        ]);
        let gallery = Rc::new(Gallery::new(api));
        gallery.load_first().await.unwrap();

        let invalidated_at = Rc::new(RefCell::new(Vec::new()));
        {
            let log = invalidated_at.clone();
            let observed = Rc::downgrade(&gallery);
            gallery.subscribe(move |event| {
                if let (GalleryEvent::Invalidated, Some(g)) = (event, observed.upgrade()) {
                    log.borrow_mut().push(g.is_fetching());
                }
            });
        }

        let (more, ()) = tokio::join!(gallery.load_more(), async {
            // load_more が応答待ちの間に登録が成功した
            gallery.invalidate();
            assert!(gallery.is_fetching());
            assert!(gallery.is_loading_first());
            assert!(gallery.begin_fetch(None).is_none());
        });

        assert!(!more.unwrap());
        // 通知は古い取得が終わってから1回だけ
        assert_eq!(*invalidated_at.borrow(), vec![false]);
        assert_eq!(gallery.status(), GalleryStatus::Idle);

        assert!(gallery.load_first().await.unwrap());
        assert_eq!(ids(&gallery), vec!["new", "a"]);
        assert_eq!(gallery.api().call_count(), 3);
    }

    #[test]
    fn test_begin_fetch_twice_returns_none() {
        let gallery = Gallery::new(MockApi::default());

        let ticket = gallery.begin_fetch(None);
        assert!(ticket.is_some());
        assert!(gallery.is_loading_first());
        assert!(gallery.begin_fetch(None).is_none());

        gallery.finish_fetch(ticket.unwrap(), page(&["a"], Some(1))).unwrap();
        let ticket = gallery.begin_fetch(Some(Cursor(1))).expect("ticket");
        assert!(gallery.is_loading_more());
        assert_eq!(ticket.cursor(), Some(Cursor(1)));
    }

    #[tokio::test]
    async fn test_observers_receive_snapshots() {
        let api = MockApi::with_pages(vec![page(&["a"], None)]);
        let gallery = Gallery::new(api);
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = seen.clone();
        let id = gallery.subscribe(move |event| {
            if let GalleryEvent::Changed(snapshot) = event {
                sink.borrow_mut().push(snapshot.clone());
            }
        });

        gallery.load_first().await.unwrap();

        {
            let seen = seen.borrow();
            assert_eq!(seen.len(), 2);
            assert!(seen[0].is_loading_first());
            assert_eq!(seen[1].status, GalleryStatus::Idle);
            assert_eq!(seen[1].items.len(), 1);
        }

        gallery.unsubscribe(id);
        gallery.invalidate();
        assert_eq!(seen.borrow().len(), 2);
    }

    #[tokio::test]
    async fn test_invalidate_emits_event_once() {
        let gallery = Gallery::new(MockApi::default());
        let count = Rc::new(Cell::new(0));

        let counter = count.clone();
        gallery.subscribe(move |event| {
            if matches!(event, GalleryEvent::Invalidated) {
                counter.set(counter.get() + 1);
            }
        });

        gallery.invalidate();
        assert_eq!(count.get(), 1);
    }
}
