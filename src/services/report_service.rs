//! Reportes operativos y dashboard del conductor

use chrono::{Datelike, Duration, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::delivery_dto::DeliveryResponse;
use crate::dto::driver_dto::DriverResponse;
use crate::dto::report_dto::{
    CapacityReport, DeliveryReport, DriverDashboardResponse, DriverReport, ReportAlerts,
    ReportPeriod, ReportStats, ReportsResponse, RouteReport, VehicleReport,
};
use crate::dto::route_dto::RouteResponse;
use crate::dto::vehicle_dto::VehicleResponse;
use crate::models::delivery::Delivery;
use crate::models::driver::Driver;
use crate::models::route::Route;
use crate::models::vehicle::Vehicle;
use crate::utils::errors::AppError;

/// Resuelve el período del reporte: hoy, la semana en curso o el mes en curso
pub fn resolve_period(period: Option<&str>, today: NaiveDate) -> Result<ReportPeriod, AppError> {
    match period.unwrap_or("today") {
        "today" => Ok(ReportPeriod {
            start: today,
            end: today,
            description: "Hoy".to_string(),
        }),
        "week" => {
            let start = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
            Ok(ReportPeriod {
                start,
                end: start + Duration::days(6),
                description: "Semana en curso".to_string(),
            })
        }
        "month" => {
            let start = today.with_day(1).unwrap_or(today);
            let end = if today.month() == 12 {
                NaiveDate::from_ymd_opt(today.year() + 1, 1, 1)
            } else {
                NaiveDate::from_ymd_opt(today.year(), today.month() + 1, 1)
            }
            .map(|d| d - Duration::days(1))
            .unwrap_or(today);
            Ok(ReportPeriod {
                start,
                end,
                description: "Mes en curso".to_string(),
            })
        }
        other => Err(AppError::BadRequest(format!(
            "Período inválido: '{}' (use today, week o month)",
            other
        ))),
    }
}

pub struct ReportService {
    pool: PgPool,
}

impl ReportService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Reporte general del sistema para el período indicado
    pub async fn system_report(&self, period: Option<&str>) -> Result<ReportsResponse, AppError> {
        let period = resolve_period(period, Utc::now().date_naive())?;

        let total = self
            .count(
                "SELECT COUNT(*) FROM deliveries WHERE expected_date BETWEEN $1 AND $2",
                period.start,
                period.end,
            )
            .await?;
        let completed = self
            .count(
                "SELECT COUNT(*) FROM deliveries WHERE expected_date BETWEEN $1 AND $2 AND status = 'delivered'",
                period.start,
                period.end,
            )
            .await?;
        let pending = self
            .count(
                "SELECT COUNT(*) FROM deliveries WHERE expected_date BETWEEN $1 AND $2 AND status = 'pending'",
                period.start,
                period.end,
            )
            .await?;

        let success_rate = if total > 0 {
            completed as f64 / total as f64 * 100.0
        } else {
            0.0
        };

        let drivers = DriverReport {
            active: self.count_simple("SELECT COUNT(*) FROM drivers WHERE status = 'active'").await?,
            en_route: self.count_simple("SELECT COUNT(*) FROM drivers WHERE status = 'en_route'").await?,
            available: self.count_simple("SELECT COUNT(*) FROM drivers WHERE status = 'available'").await?,
        };

        let vehicles = VehicleReport {
            available: self.count_simple("SELECT COUNT(*) FROM vehicles WHERE status = 'available'").await?,
            in_use: self.count_simple("SELECT COUNT(*) FROM vehicles WHERE status = 'in_use'").await?,
            maintenance: self.count_simple("SELECT COUNT(*) FROM vehicles WHERE status = 'maintenance'").await?,
        };

        let routes = RouteReport {
            active: self.count_simple("SELECT COUNT(*) FROM routes WHERE status = 'in_progress'").await?,
            completed: self
                .count(
                    "SELECT COUNT(*) FROM routes WHERE status = 'completed' AND route_date BETWEEN $1 AND $2",
                    period.start,
                    period.end,
                )
                .await?,
        };

        // Capacidad agregada de la flota en uso vs. lo adjudicado en rutas activas
        let utilized: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(utilized_capacity), 0) FROM routes WHERE status = 'in_progress'",
        )
        .fetch_one(&self.pool)
        .await?;
        let fleet_total: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(max_capacity), 0) FROM vehicles WHERE status IN ('available', 'in_use')",
        )
        .fetch_one(&self.pool)
        .await?;

        let capacity = CapacityReport {
            utilized,
            total: fleet_total,
            available: (fleet_total - utilized).max(0),
            percent: if fleet_total > 0 {
                utilized as f64 / fleet_total as f64 * 100.0
            } else {
                0.0
            },
        };

        let alerts = ReportAlerts {
            pending_without_driver: self
                .count_simple(
                    "SELECT COUNT(*) FROM deliveries WHERE status = 'pending' AND driver_id IS NULL",
                )
                .await?,
            pending_without_route: self
                .count_simple(
                    "SELECT COUNT(*) FROM deliveries WHERE status = 'pending' AND route_id IS NULL",
                )
                .await?,
            vehicles_in_maintenance: vehicles.maintenance,
        };

        Ok(ReportsResponse {
            period,
            stats: ReportStats {
                deliveries: DeliveryReport {
                    total,
                    completed,
                    pending,
                    success_rate,
                },
                drivers,
                vehicles,
                routes,
                capacity,
            },
            alerts,
        })
    }

    /// Dashboard del conductor autenticado
    pub async fn driver_dashboard(
        &self,
        driver_id: Uuid,
    ) -> Result<DriverDashboardResponse, AppError> {
        let driver = sqlx::query_as::<_, Driver>("SELECT * FROM drivers WHERE id = $1")
            .bind(driver_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Conductor no encontrado".to_string()))?;

        let current_vehicle = sqlx::query_as::<_, Vehicle>(
            "SELECT * FROM vehicles WHERE current_driver_id = $1 AND status = 'in_use'",
        )
        .bind(driver_id)
        .fetch_optional(&self.pool)
        .await?;

        let active_routes = sqlx::query_as::<_, Route>(
            r#"
            SELECT * FROM routes
            WHERE driver_id = $1 AND status IN ('planned', 'in_progress')
            ORDER BY route_date, name
            "#,
        )
        .bind(driver_id)
        .fetch_all(&self.pool)
        .await?;

        let today = Utc::now().date_naive();
        let deliveries_today = sqlx::query_as::<_, Delivery>(
            r#"
            SELECT * FROM deliveries
            WHERE driver_id = $1 AND expected_date = $2
            ORDER BY requested_at, id
            "#,
        )
        .bind(driver_id)
        .bind(today)
        .fetch_all(&self.pool)
        .await?;

        let total_deliveries: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM deliveries WHERE driver_id = $1")
                .bind(driver_id)
                .fetch_one(&self.pool)
                .await?;
        let pending_deliveries: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM deliveries WHERE driver_id = $1 AND status IN ('pending', 'in_transit', 'rescheduled')",
        )
        .bind(driver_id)
        .fetch_one(&self.pool)
        .await?;
        let completed_deliveries: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM deliveries WHERE driver_id = $1 AND status = 'delivered'",
        )
        .bind(driver_id)
        .fetch_one(&self.pool)
        .await?;

        let utilized_capacity: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(utilized_capacity), 0) FROM routes
            WHERE driver_id = $1 AND status = 'in_progress'
            "#,
        )
        .bind(driver_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(DriverDashboardResponse {
            driver: DriverResponse::from(driver),
            current_vehicle: current_vehicle.map(VehicleResponse::from),
            active_routes: active_routes.into_iter().map(RouteResponse::from).collect(),
            deliveries_today: deliveries_today
                .into_iter()
                .map(DeliveryResponse::from)
                .collect(),
            total_deliveries,
            pending_deliveries,
            completed_deliveries,
            utilized_capacity,
        })
    }

    async fn count(&self, sql: &str, start: NaiveDate, end: NaiveDate) -> Result<i64, AppError> {
        let value: i64 = sqlx::query_scalar(sql)
            .bind(start)
            .bind(end)
            .fetch_one(&self.pool)
            .await?;
        Ok(value)
    }

    async fn count_simple(&self, sql: &str) -> Result<i64, AppError> {
        let value: i64 = sqlx::query_scalar(sql).fetch_one(&self.pool).await?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn today_period_is_single_day() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 12).unwrap();
        let period = resolve_period(Some("today"), today).unwrap();
        assert_eq!(period.start, today);
        assert_eq!(period.end, today);
    }

    #[test]
    fn week_period_starts_on_monday() {
        // 2025-03-12 es miércoles
        let today = NaiveDate::from_ymd_opt(2025, 3, 12).unwrap();
        let period = resolve_period(Some("week"), today).unwrap();
        assert_eq!(period.start, NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
        assert_eq!(period.end, NaiveDate::from_ymd_opt(2025, 3, 16).unwrap());
    }

    #[test]
    fn month_period_covers_whole_month() {
        let today = NaiveDate::from_ymd_opt(2025, 12, 15).unwrap();
        let period = resolve_period(Some("month"), today).unwrap();
        assert_eq!(period.start, NaiveDate::from_ymd_opt(2025, 12, 1).unwrap());
        assert_eq!(period.end, NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
    }

    #[test]
    fn missing_period_defaults_to_today() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let period = resolve_period(None, today).unwrap();
        assert_eq!(period.start, today);
        assert_eq!(period.end, today);
    }

    #[test]
    fn unknown_period_is_rejected() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert!(resolve_period(Some("year"), today).is_err());
    }
}
