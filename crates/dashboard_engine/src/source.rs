use async_trait::async_trait;
use finance_client::{ClientError, FinanceClient};
use models::{
    Envelope, FinancialReport, FinancialReportQuery, InventoryReport, ReportPeriod, SalesReport,
    SalesReportQuery,
};

/// The three report fetches a batch issues.
#[async_trait]
pub trait ReportsSource: Send + Sync {
    async fn sales_report(&self, period: ReportPeriod)
        -> Result<Envelope<SalesReport>, ClientError>;

    async fn inventory_report(&self) -> Result<Envelope<InventoryReport>, ClientError>;

    async fn financial_report(
        &self,
        period: ReportPeriod,
        year: i32,
    ) -> Result<Envelope<FinancialReport>, ClientError>;
}

#[async_trait]
impl ReportsSource for FinanceClient {
    async fn sales_report(
        &self,
        period: ReportPeriod,
    ) -> Result<Envelope<SalesReport>, ClientError> {
        self.get_sales_report(&SalesReportQuery {
            period: Some(period),
        })
        .await
    }

    async fn inventory_report(&self) -> Result<Envelope<InventoryReport>, ClientError> {
        self.get_inventory_report().await
    }

    async fn financial_report(
        &self,
        period: ReportPeriod,
        year: i32,
    ) -> Result<Envelope<FinancialReport>, ClientError> {
        self.get_financial_report(&FinancialReportQuery {
            period: Some(period),
            year: Some(year),
        })
        .await
    }
}
