//! In-process notification sink.
//!
//! Notifications are advisory: they are produced after the DB transaction
//! commits, fan out fire-and-forget, and are erased when read. Losing them
//! on restart is acceptable; failing a ledger write over them is not.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use api_types::notification::{NotificationView, NotificationsView};
use engine::{Cost, Engine, Income, money};

pub(crate) const BIG_COST_LEVEL: &str = "📉";
pub(crate) const INCOME_LEVEL: &str = "📈";

#[derive(Default)]
struct Bucket {
    big_costs: Vec<NotificationView>,
    incomes: Vec<NotificationView>,
}

/// Per-user notification queues, drained on read.
#[derive(Clone, Default)]
pub struct Notifier {
    inner: Arc<Mutex<HashMap<i32, Bucket>>>,
}

impl Notifier {
    pub async fn push_big_cost(&self, user_id: i32, message: String) {
        let mut inner = self.inner.lock().await;
        inner
            .entry(user_id)
            .or_default()
            .big_costs
            .push(NotificationView {
                message,
                level: BIG_COST_LEVEL.to_string(),
            });
    }

    pub async fn push_income(&self, user_id: i32, message: String) {
        let mut inner = self.inner.lock().await;
        inner
            .entry(user_id)
            .or_default()
            .incomes
            .push(NotificationView {
                message,
                level: INCOME_LEVEL.to_string(),
            });
    }

    /// Take everything queued for the user, leaving nothing behind.
    pub async fn drain(&self, user_id: i32) -> NotificationsView {
        let mut inner = self.inner.lock().await;
        let bucket = inner.remove(&user_id).unwrap_or_default();
        NotificationsView {
            big_costs: bucket.big_costs,
            incomes: bucket.incomes,
        }
    }
}

/// Tell other users about a cost that crossed their threshold.
pub(crate) async fn notify_about_big_cost(engine: Arc<Engine>, notifier: Notifier, cost: Cost) {
    let audience = match engine.users_for_big_cost(cost.value, cost.user_id).await {
        Ok(audience) => audience,
        Err(err) => {
            tracing::error!("big cost notification skipped: {err}");
            return;
        }
    };

    let message = format!(
        "{}: {} {}",
        cost.name,
        money::pretty_money(cost.value),
        cost.currency.sign
    );
    for user in audience {
        notifier.push_big_cost(user.id, message.clone()).await;
    }
}

/// Tell the rest of the family about an income.
pub(crate) async fn notify_about_income(engine: Arc<Engine>, notifier: Notifier, income: Income) {
    let audience = match engine.users_excluding(income.user_id).await {
        Ok(audience) => audience,
        Err(err) => {
            tracing::error!("income notification skipped: {err}");
            return;
        }
    };

    let message = format!(
        "{}: {} {}",
        income.name,
        money::pretty_money(income.value),
        income.currency.sign
    );
    for user in audience {
        notifier.push_income(user.id, message.clone()).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn drain_erases_the_queue() {
        let notifier = Notifier::default();
        notifier.push_big_cost(1, "rent: 500 $".to_string()).await;
        notifier.push_income(1, "salary: 2000 $".to_string()).await;

        let first = notifier.drain(1).await;
        assert_eq!(first.big_costs.len(), 1);
        assert_eq!(first.incomes.len(), 1);

        let second = notifier.drain(1).await;
        assert!(second.big_costs.is_empty());
        assert!(second.incomes.is_empty());
    }

    #[tokio::test]
    async fn queues_are_per_user() {
        let notifier = Notifier::default();
        notifier.push_big_cost(1, "rent: 500 $".to_string()).await;

        let other = notifier.drain(2).await;
        assert!(other.big_costs.is_empty());

        let own = notifier.drain(1).await;
        assert_eq!(own.big_costs.len(), 1);
        assert_eq!(own.big_costs[0].level, BIG_COST_LEVEL);
    }
}
