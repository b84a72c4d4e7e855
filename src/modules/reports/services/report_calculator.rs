//! Report arithmetic over already-fetched rows.
//!
//! Nothing here touches storage, so the same inputs always give the same
//! report. Cancelled sales never count towards revenue, cost or VAT.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::core::money::{percentage, ratio_or_zero, round_money};
use crate::core::{AppError, DateRangeQuery, Result};
use crate::modules::reports::models::{
    DailyProfit, Dashboard, DashboardInputs, PendingPaymentRow, PendingPaymentsReport,
    ProfitLine, ProfitLossReport, ProfitSummary, StockSummary, VatPurchaseLine, VatReport,
    VatSaleLine, YearlyStats,
};
use crate::modules::sales::models::{SaleStatus, SaleView};
use crate::modules::stock::models::StockBatch;

/// Computes dashboard, VAT, profit & loss and pending payment figures
#[derive(Debug, Clone, Copy)]
pub struct ReportCalculator {
    vat_rate_percent: Decimal,
}

impl ReportCalculator {
    /// Calculator for a VAT rate given in percent (5 for UAE VAT)
    pub fn new(vat_rate_percent: Decimal) -> Result<Self> {
        if vat_rate_percent < Decimal::ZERO || vat_rate_percent > Decimal::ONE_HUNDRED {
            return Err(AppError::validation(
                "VAT rate must be between 0 and 100 percent",
            ));
        }
        Ok(Self { vat_rate_percent })
    }

    pub fn vat_rate_percent(&self) -> Decimal {
        self.vat_rate_percent
    }

    /// VAT due on an amount, rounded to fils
    pub fn vat_on(&self, amount: Decimal) -> Decimal {
        round_money(amount * self.vat_rate_percent / Decimal::ONE_HUNDRED)
    }

    pub fn dashboard(&self, inputs: DashboardInputs) -> Dashboard {
        let mut by_date: BTreeMap<NaiveDate, (Decimal, Decimal, Decimal)> = BTreeMap::new();
        for view in financial(&inputs.year_sales) {
            let sale = &view.sale;
            let entry = by_date
                .entry(sale.sale_date)
                .or_insert((Decimal::ZERO, Decimal::ZERO, Decimal::ZERO));
            entry.0 += sale.quantity;
            entry.1 += sale.total_amount;
            entry.2 += sale.cost();
        }

        let daily_profits: Vec<DailyProfit> = by_date
            .into_iter()
            .map(|(sale_date, (quantity, amount, cost))| {
                let amount = round_money(amount);
                let cost = round_money(cost);
                DailyProfit {
                    sale_date,
                    quantity,
                    amount,
                    cost,
                    profit: amount - cost,
                }
            })
            .collect();

        let total_quantity: Decimal = daily_profits.iter().map(|d| d.quantity).sum();
        let total_amount: Decimal = daily_profits.iter().map(|d| d.amount).sum();
        let total_cost: Decimal = daily_profits.iter().map(|d| d.cost).sum();
        let total_profit = total_amount - total_cost;

        Dashboard {
            daily_profits,
            yearly_stats: YearlyStats {
                total_quantity,
                total_amount,
                total_cost,
                total_profit,
                profit_margin: percentage(total_profit, total_amount),
            },
            pending_lpo_count: inputs.pending_lpo_count,
            pending_invoice_count: inputs.pending_invoice_count,
            recent_sales: inputs.recent_sales,
            stock_summary: StockSummary {
                total_quantity: inputs.stock_remaining,
            },
        }
    }

    /// Input VAT on purchases and output VAT on sales.
    ///
    /// Input VAT uses the quantity originally purchased, so it does not shrink
    /// as the batch is consumed. Totals are sums of the rounded lines.
    pub fn vat(
        &self,
        range: DateRangeQuery,
        purchases: &[StockBatch],
        sales: &[SaleView],
    ) -> VatReport {
        let mut purchase_lines: Vec<VatPurchaseLine> = purchases
            .iter()
            .map(|batch| {
                let purchase_value = round_money(batch.purchase_value());
                VatPurchaseLine {
                    stock_id: batch.id.clone(),
                    purchase_date: batch.purchase_date,
                    supplier: batch.supplier.clone(),
                    quantity: batch.initial_quantity,
                    purchase_cost: batch.purchase_cost,
                    purchase_value,
                    vat_amount: self.vat_on(batch.purchase_value()),
                }
            })
            .collect();
        purchase_lines.sort_by(|a, b| {
            (a.purchase_date, &a.stock_id).cmp(&(b.purchase_date, &b.stock_id))
        });

        let mut sale_lines: Vec<VatSaleLine> = financial(sales)
            .map(|view| VatSaleLine {
                sale_id: view.sale.id.clone(),
                sale_date: view.sale.sale_date,
                client: view.client_name.clone(),
                project: view.project_name.clone(),
                total_amount: view.sale.total_amount,
                vat_amount: self.vat_on(view.sale.total_amount),
            })
            .collect();
        sale_lines.sort_by(|a, b| (a.sale_date, &a.sale_id).cmp(&(b.sale_date, &b.sale_id)));

        let total_input_vat: Decimal = purchase_lines.iter().map(|l| l.vat_amount).sum();
        let total_output_vat: Decimal = sale_lines.iter().map(|l| l.vat_amount).sum();

        VatReport {
            start: range.start,
            end: range.end,
            vat_percentage: self.vat_rate_percent,
            purchases: purchase_lines,
            sales: sale_lines,
            total_input_vat,
            total_output_vat,
            net_vat: total_output_vat - total_input_vat,
        }
    }

    pub fn profit_loss(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        sales: &[SaleView],
    ) -> ProfitLossReport {
        let mut lines: Vec<ProfitLine> = financial(sales)
            .map(|view| {
                let sale = &view.sale;
                let cost = round_money(sale.cost());
                ProfitLine {
                    sale_id: sale.id.clone(),
                    sale_date: sale.sale_date,
                    client: view.client_name.clone(),
                    project: view.project_name.clone(),
                    quantity: sale.quantity,
                    unit_price: sale.unit_price,
                    purchase_cost: sale.purchase_cost,
                    total_amount: sale.total_amount,
                    cost,
                    profit: sale.total_amount - cost,
                }
            })
            .collect();
        lines.sort_by(|a, b| (a.sale_date, &a.sale_id).cmp(&(b.sale_date, &b.sale_id)));

        let total_sales: Decimal = lines.iter().map(|l| l.total_amount).sum();
        let total_cost: Decimal = lines.iter().map(|l| l.cost).sum();
        let total_quantity: Decimal = lines.iter().map(|l| l.quantity).sum();
        let total_profit = total_sales - total_cost;

        ProfitLossReport {
            start,
            end,
            sales: lines,
            summary: ProfitSummary {
                total_sales,
                total_cost,
                total_profit,
                total_quantity,
                average_profit: round_money(ratio_or_zero(total_profit, total_quantity)),
                profit_margin: percentage(total_profit, total_sales),
            },
        }
    }

    /// Outstanding balances per client project.
    ///
    /// Settled and cancelled sales are skipped, as are sales with nothing left
    /// to collect.
    pub fn pending_payments(&self, sales: &[SaleView]) -> PendingPaymentsReport {
        let mut groups: BTreeMap<(String, String), PendingPaymentRow> = BTreeMap::new();

        for view in sales {
            match view.sale.status {
                SaleStatus::FullyPaid | SaleStatus::Cancelled => continue,
                SaleStatus::PendingLpo
                | SaleStatus::LpoReceived
                | SaleStatus::InvoiceGenerated
                | SaleStatus::PartiallyPaid => {}
            }

            let pending = view.sale.total_amount - view.paid_amount;
            if pending <= Decimal::ZERO {
                continue;
            }

            let key = (view.sale.client_id.clone(), view.sale.project_id.clone());
            let row = groups.entry(key).or_insert_with(|| PendingPaymentRow {
                client_id: view.sale.client_id.clone(),
                client: view.client_name.clone(),
                project_id: view.sale.project_id.clone(),
                project: view.project_name.clone(),
                total_amount: Decimal::ZERO,
                total_paid: Decimal::ZERO,
                pending_amount: Decimal::ZERO,
            });
            row.total_amount += view.sale.total_amount;
            row.total_paid += view.paid_amount;
            row.pending_amount += pending;
        }

        let mut entries: Vec<PendingPaymentRow> = groups
            .into_values()
            .map(|mut row| {
                row.total_amount = round_money(row.total_amount);
                row.total_paid = round_money(row.total_paid);
                row.pending_amount = round_money(row.pending_amount);
                row
            })
            .collect();
        entries.sort_by(|a, b| {
            b.pending_amount
                .cmp(&a.pending_amount)
                .then_with(|| a.client.cmp(&b.client))
                .then_with(|| a.project.cmp(&b.project))
                .then_with(|| (&a.client_id, &a.project_id).cmp(&(&b.client_id, &b.project_id)))
        });

        let total_pending = entries.iter().map(|e| e.pending_amount).sum();

        PendingPaymentsReport {
            entries,
            total_pending,
        }
    }
}

impl Default for ReportCalculator {
    fn default() -> Self {
        Self {
            vat_rate_percent: Decimal::from(5),
        }
    }
}

fn financial(sales: &[SaleView]) -> impl Iterator<Item = &SaleView> {
    sales.iter().filter(|view| view.sale.status.is_financial())
}
