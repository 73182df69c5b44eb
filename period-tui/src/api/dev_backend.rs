use crate::types::{
    AdjustKind, AdjustPeriod, CandidateRecord, PeriodInfo, Prediction, PredictionInfo,
    ProfileForm, SelectedDate,
};
use std::sync::{Arc, Mutex};
use time::{Date, Duration};

use super::ApiError;

/// Password accepted by the dev backend's account deletion.
pub const DEV_PASSWORD: &str = "dev";

const CANDIDATE_WINDOW_DAYS: i64 = 14;
const MAX_PERIOD_DAYS: i64 = 14;

/// In-memory stand-in for the server. Validation messages match the server's;
/// end-only submissions resolve their record here instead of being rejected.
#[derive(Debug, Clone)]
pub struct DevBackend {
    store: Arc<Mutex<DevStore>>,
}

#[derive(Debug, Clone)]
struct DevStore {
    records: Vec<DevRecord>,
    next_id: i64,
    cycle_length: u32,
    period_length: u32,
    account_deleted: bool,
}

#[derive(Debug, Clone)]
struct DevRecord {
    id: i64,
    start_date: Date,
    end_date: Date,
    is_predicted: bool,
    is_deleted: bool,
}

impl DevRecord {
    fn covers(&self, date: Date) -> bool {
        !self.is_deleted && self.start_date <= date && date <= self.end_date
    }
}

fn parse_day(raw: Option<&str>) -> Result<Date, ApiError> {
    raw.and_then(|s| s.parse::<SelectedDate>().ok())
        .map(SelectedDate::date)
        .ok_or_else(|| ApiError::rejected("无效的操作或日期"))
}

fn format_day(date: Date) -> String {
    SelectedDate::new(date).to_string()
}

fn days_after(date: Date, days: i64) -> Result<Date, ApiError> {
    date.checked_add(Duration::days(days))
        .ok_or_else(|| ApiError::rejected("无效的操作或日期"))
}

impl DevBackend {
    pub fn new(today: Date) -> Self {
        Self {
            store: Arc::new(Mutex::new(seed_dev_store(today))),
        }
    }

    #[cfg(test)]
    fn empty() -> Self {
        Self {
            store: Arc::new(Mutex::new(DevStore {
                records: Vec::new(),
                next_id: 1,
                cycle_length: 28,
                period_length: 5,
                account_deleted: false,
            })),
        }
    }

    fn with_store<T>(
        &self,
        f: impl FnOnce(&mut DevStore) -> Result<T, ApiError>,
    ) -> Result<T, ApiError> {
        let mut store = self
            .store
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if store.account_deleted {
            return Err(ApiError::Unauthorized);
        }
        f(&mut store)
    }

    pub fn period_info(&self, date: Date) -> Result<PeriodInfo, ApiError> {
        self.with_store(|store| {
            let is_start_possible = !store.records.iter().any(|r| r.covers(date));
            let window_start = date.saturating_sub(Duration::days(CANDIDATE_WINDOW_DAYS));
            let end_candidate_records = store
                .records
                .iter()
                .filter(|r| !r.is_deleted && window_start <= r.start_date && r.start_date <= date)
                .map(|r| CandidateRecord {
                    id: r.id,
                    start_date: format_day(r.start_date),
                    is_predicted: r.is_predicted,
                    current_end_date: Some(format_day(r.end_date)),
                })
                .collect();

            Ok(PeriodInfo {
                date: Some(format_day(date)),
                is_start_possible,
                end_candidate_records,
            })
        })
    }

    pub fn mark_start(&self, start: Date) -> Result<(), ApiError> {
        self.with_store(|store| {
            let end_date = days_after(start, store.period_length as i64 - 1)?;
            let id = store.next_id;
            store.next_id += 1;
            store.records.push(DevRecord {
                id,
                start_date: start,
                end_date,
                is_predicted: false,
                is_deleted: false,
            });
            Ok(())
        })
    }

    /// End-only submissions resolve to the latest record that started within
    /// the window before `end`.
    pub fn mark_end(&self, end: Date) -> Result<(), ApiError> {
        self.with_store(|store| {
            let window_start = end.saturating_sub(Duration::days(CANDIDATE_WINDOW_DAYS));
            let record = store
                .records
                .iter_mut()
                .filter(|r| !r.is_deleted && window_start <= r.start_date && r.start_date <= end)
                .max_by_key(|r| r.start_date)
                .ok_or_else(|| ApiError::rejected("未找到对应的经期记录"))?;

            if end > record.start_date.saturating_add(Duration::days(MAX_PERIOD_DAYS)) {
                return Err(ApiError::rejected("经期持续时间过长，请检查日期"));
            }
            record.end_date = end;
            record.is_predicted = false;
            Ok(())
        })
    }

    pub fn adjust_period(&self, request: &AdjustPeriod) -> Result<(), ApiError> {
        self.with_store(|store| {
            let record = store
                .records
                .iter_mut()
                .find(|r| r.id == request.record_id)
                .ok_or_else(|| ApiError::rejected("记录不存在"))?;

            match request.kind {
                AdjustKind::Start => {
                    let start = parse_day(request.start_date.as_deref())?;
                    if start > record.end_date {
                        return Err(ApiError::rejected("开始日期不能晚于结束日期"));
                    }
                    record.start_date = start;
                }
                AdjustKind::End => {
                    let end = parse_day(request.end_date.as_deref())?;
                    if end < record.start_date {
                        return Err(ApiError::rejected("结束日期不能早于开始日期"));
                    }
                    record.end_date = end;
                    record.is_predicted = false;
                }
                AdjustKind::Both => {
                    let start = parse_day(request.start_date.as_deref())?;
                    let end = parse_day(request.end_date.as_deref())?;
                    if start > end {
                        return Err(ApiError::rejected("开始日期不能晚于结束日期"));
                    }
                    record.start_date = start;
                    record.end_date = end;
                    record.is_predicted = false;
                }
            }
            Ok(())
        })
    }

    pub fn delete_record(&self, record_id: i64) -> Result<(), ApiError> {
        self.with_store(|store| {
            let record = store
                .records
                .iter_mut()
                .find(|r| r.id == record_id)
                .ok_or_else(|| ApiError::rejected("记录不存在"))?;
            record.is_deleted = true;
            Ok(())
        })
    }

    pub fn delete_account(&self, password: &str) -> Result<(), ApiError> {
        self.with_store(|store| {
            let password = password.trim();
            if password.is_empty() {
                return Err(ApiError::rejected("请输入密码确认删除操作"));
            }
            if password != DEV_PASSWORD {
                return Err(ApiError::rejected("密码错误，删除操作已取消"));
            }
            store.account_deleted = true;
            store.records.clear();
            Ok(())
        })
    }

    pub fn save_profile(&self, form: &ProfileForm) -> Result<(), ApiError> {
        self.with_store(|store| {
            let invalid = || ApiError::rejected("请输入有效的数字");
            let cycle_length: u32 = form.cycle_length.trim().parse().map_err(|_| invalid())?;
            let period_length: u32 = form.period_length.trim().parse().map_err(|_| invalid())?;

            if !(15..=45).contains(&cycle_length) {
                return Err(ApiError::rejected("月经间隔天数必须在15-45天之间"));
            }
            if !(1..=10).contains(&period_length) {
                return Err(ApiError::rejected("经期持续天数必须在1-10天之间"));
            }
            store.cycle_length = cycle_length;
            store.period_length = period_length;
            Ok(())
        })
    }

    /// Up to three cycles counted from the end of the latest confirmed record.
    /// Cycles past the supported date range are left out.
    pub fn predictions(&self) -> Result<PredictionInfo, ApiError> {
        self.with_store(|store| {
            let live = store.records.iter().filter(|r| !r.is_deleted);
            let latest = live
                .clone()
                .filter(|r| !r.is_predicted)
                .max_by_key(|r| r.start_date)
                .or_else(|| live.max_by_key(|r| r.start_date));

            let mut predictions = Vec::new();
            if let Some(latest) = latest {
                let cycle = Duration::days(store.cycle_length as i64);
                let span = Duration::days(store.period_length as i64 - 1);
                let mut next_start = latest.end_date.checked_add(cycle);
                for index in 0..3u32 {
                    let Some((start, end)) =
                        next_start.and_then(|start| Some((start, start.checked_add(span)?)))
                    else {
                        break;
                    };
                    next_start = start.checked_add(cycle);
                    predictions.push(Prediction {
                        cycle: index + 1,
                        start_date: format_day(start),
                        end_date: format_day(end),
                        is_current: index == 0,
                        calculation_note: (index == 0).then(|| {
                            format!(
                                "基于{}结束 + {}天间隔",
                                format_day(latest.end_date),
                                store.cycle_length
                            )
                        }),
                    });
                }
            }

            Ok(PredictionInfo {
                predictions,
                cycle_length: Some(store.cycle_length),
                period_length: Some(store.period_length),
            })
        })
    }
}

fn seed_dev_store(today: Date) -> DevStore {
    let record = |id: i64, start_offset: i64, length: i64, is_predicted: bool| {
        let start_date = today.saturating_sub(Duration::days(start_offset));
        DevRecord {
            id,
            start_date,
            end_date: start_date.saturating_add(Duration::days(length - 1)),
            is_predicted,
            is_deleted: false,
        }
    };

    DevStore {
        records: vec![record(1, 62, 5, false), record(2, 33, 6, false), record(3, 4, 5, true)],
        next_id: 4,
        cycle_length: 28,
        period_length: 5,
        account_deleted: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn backend_with_record(start: Date) -> DevBackend {
        let backend = DevBackend::empty();
        backend.mark_start(start).unwrap();
        backend
    }

    fn rejection(result: Result<(), ApiError>) -> String {
        match result {
            Err(ApiError::Rejected(message)) => message,
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn info_reports_covered_dates_and_recent_candidates() {
        let backend = backend_with_record(date!(2024 - 03 - 01));

        let inside = backend.period_info(date!(2024 - 03 - 03)).unwrap();
        assert!(!inside.is_start_possible);
        assert_eq!(inside.end_candidate_records.len(), 1);
        assert_eq!(
            inside.end_candidate_records[0].current_end_date.as_deref(),
            Some("2024-03-05")
        );

        let later = backend.period_info(date!(2024 - 03 - 10)).unwrap();
        assert!(later.is_start_possible);
        assert_eq!(later.end_candidate_records.len(), 1);

        let far = backend.period_info(date!(2024 - 03 - 20)).unwrap();
        assert!(far.is_start_possible);
        assert!(far.end_candidate_records.is_empty());
    }

    #[test]
    fn mark_end_updates_latest_recent_record() {
        let backend = backend_with_record(date!(2024 - 03 - 01));
        backend.mark_end(date!(2024 - 03 - 07)).unwrap();

        let info = backend.period_info(date!(2024 - 03 - 07)).unwrap();
        assert!(!info.is_start_possible);

        assert_eq!(
            rejection(backend.mark_end(date!(2024 - 04 - 20))),
            "未找到对应的经期记录"
        );
    }

    #[test]
    fn adjust_rejects_inverted_ranges() {
        let backend = backend_with_record(date!(2024 - 03 - 01));
        let request = AdjustPeriod {
            record_id: 1,
            kind: AdjustKind::Start,
            start_date: Some("2024-03-09".to_string()),
            end_date: None,
        };
        assert_eq!(
            rejection(backend.adjust_period(&request)),
            "开始日期不能晚于结束日期"
        );

        let both = AdjustPeriod {
            record_id: 1,
            kind: AdjustKind::Both,
            start_date: Some("2024-03-01".to_string()),
            end_date: Some("2024-03-06".to_string()),
        };
        backend.adjust_period(&both).unwrap();
        assert!(!backend
            .period_info(date!(2024 - 03 - 06))
            .unwrap()
            .is_start_possible);
    }

    #[test]
    fn adjust_unknown_record_is_rejected() {
        let backend = DevBackend::empty();
        let request = AdjustPeriod {
            record_id: 99,
            kind: AdjustKind::End,
            start_date: None,
            end_date: Some("2024-03-06".to_string()),
        };
        assert_eq!(rejection(backend.adjust_period(&request)), "记录不存在");
    }

    #[test]
    fn deleted_records_disappear_from_info() {
        let backend = backend_with_record(date!(2024 - 03 - 01));
        backend.delete_record(1).unwrap();

        let info = backend.period_info(date!(2024 - 03 - 02)).unwrap();
        assert!(info.is_start_possible);
        assert!(info.end_candidate_records.is_empty());
        assert_eq!(rejection(backend.delete_record(42)), "记录不存在");
    }

    #[test]
    fn profile_validation_matches_server_messages() {
        let backend = DevBackend::empty();
        let form = |cycle: &str, period: &str| ProfileForm {
            cycle_length: cycle.to_string(),
            period_length: period.to_string(),
        };

        assert_eq!(
            rejection(backend.save_profile(&form("abc", "5"))),
            "请输入有效的数字"
        );
        assert_eq!(
            rejection(backend.save_profile(&form("14", "5"))),
            "月经间隔天数必须在15-45天之间"
        );
        assert_eq!(
            rejection(backend.save_profile(&form("28", "11"))),
            "经期持续天数必须在1-10天之间"
        );
        backend.save_profile(&form("30", "6")).unwrap();

        let info = backend.predictions().unwrap();
        assert_eq!(info.cycle_length, Some(30));
        assert_eq!(info.period_length, Some(6));
    }

    #[test]
    fn predictions_count_from_latest_confirmed_end() {
        let backend = backend_with_record(date!(2024 - 03 - 01));
        let info = backend.predictions().unwrap();

        assert_eq!(info.predictions.len(), 3);
        assert_eq!(info.predictions[0].start_date, "2024-04-02");
        assert_eq!(info.predictions[0].end_date, "2024-04-06");
        assert!(info.predictions[0].is_current);
        assert_eq!(info.predictions[1].start_date, "2024-04-30");
        assert!(!info.predictions[1].is_current);
    }

    #[test]
    fn dates_near_the_range_end_never_overflow() {
        let backend = backend_with_record(date!(9999 - 12 - 01));

        let info = backend.predictions().unwrap();
        assert!(info.predictions.is_empty());

        assert_eq!(
            rejection(backend.mark_end(date!(9999 - 12 - 31))),
            "未找到对应的经期记录"
        );
        assert_eq!(
            rejection(backend.mark_start(date!(9999 - 12 - 30))),
            "无效的操作或日期"
        );
        assert!(backend.period_info(date!(9999 - 12 - 31)).is_ok());
    }

    #[test]
    fn predictions_stop_at_the_range_end() {
        let backend = backend_with_record(date!(9999 - 10 - 01));
        let info = backend.predictions().unwrap();

        assert_eq!(info.predictions.len(), 2);
        assert_eq!(info.predictions[0].start_date, "9999-11-02");
        assert_eq!(info.predictions[1].start_date, "9999-11-30");
    }

    #[test]
    fn account_deletion_requires_password_and_ends_session() {
        let backend = backend_with_record(date!(2024 - 03 - 01));

        assert_eq!(
            rejection(backend.delete_account("  ")),
            "请输入密码确认删除操作"
        );
        assert_eq!(
            rejection(backend.delete_account("wrong")),
            "密码错误，删除操作已取消"
        );
        backend.delete_account(DEV_PASSWORD).unwrap();
        assert!(matches!(
            backend.period_info(date!(2024 - 03 - 01)),
            Err(ApiError::Unauthorized)
        ));
    }
}
