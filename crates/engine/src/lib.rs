pub use categories::CostCategory;
pub use costs::{Cost, CostDraft, CostPatch};
pub use currencies::Currency;
pub use error::EngineError;
pub use exchanges::{Exchange, ExchangeDraft};
pub use incomes::{Income, IncomeDraft, IncomePatch, IncomeSource};
pub use ops::{Engine, EngineBuilder};
pub use ops::analytics::{
    AnalyticsFilter, CategoryBreakdown, CostsSummary, CurrencyAnalytics, IncomesSummary,
    SourceBreakdown,
};
pub use ops::transactions::{OperationKind, TransactionRow, TransactionsFilter};
pub use shortcuts::{CostShortcut, CostShortcutDraft};

pub mod categories;
pub mod costs;
pub mod currencies;
mod error;
pub mod exchanges;
pub mod imported;
pub mod incomes;
pub mod money;
mod ops;
pub mod shortcuts;
pub mod users;

type ResultEngine<T> = Result<T, EngineError>;
