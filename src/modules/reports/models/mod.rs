mod report;

pub use report::{
    DailyProfit, Dashboard, DashboardInputs, PendingPaymentRow, PendingPaymentsReport,
    ProfitLine, ProfitLossReport, ProfitSummary, StockSummary, VatPurchaseLine, VatReport,
    VatSaleLine, YearlyStats,
};
