//! 通知（トースト）

use crate::app::AppState;
use gallery_common::{Notification, NotificationStatus};
use leptos::prelude::*;

/// 表示中の通知
///
/// 表示するたびに番号を振り、タイマーは自分の番号の通知だけを消す。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToastSlot {
    seq: u64,
    current: Option<(u64, Notification)>,
}

impl ToastSlot {
    /// 通知を表示し、その番号を返す
    pub fn show(&mut self, notification: Notification) -> u64 {
        self.seq += 1;
        self.current = Some((self.seq, notification));
        self.seq
    }

    /// 番号 `id` の通知がまだ表示中なら消す
    pub fn expire(&mut self, id: u64) -> bool {
        if self.current.as_ref().map(|(shown, _)| *shown) == Some(id) {
            self.current = None;
            true
        } else {
            false
        }
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref().map(|(_, notification)| notification)
    }
}

fn toast_class(status: NotificationStatus) -> String {
    format!("toast toast-{}", status.as_str())
}

#[component]
pub fn Toast(state: AppState) -> impl IntoView {
    move || {
        state.toast.with(|slot| slot.current().cloned()).map(|notification: Notification| {
            view! {
                <div class=toast_class(notification.status) role="status">
                    <div class="toast-body">
                        <strong>{notification.title}</strong>
                        <p>{notification.description}</p>
                    </div>
                    <button class="toast-close" on:click=move |_| state.dismiss_toast()>
                        "×"
                    </button>
                </div>
            }
        })
    }
}
