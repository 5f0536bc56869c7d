use super::domain::ScheduleRow;

/// Aggregate timeliness over a set of schedule rows.
///
/// Every ratio here has an explicit zero-denominator substitute: an empty
/// row set reports a 100% on-time rate (no history is treated as perfect
/// history) and a 0.0 average lateness.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PaymentTimeliness {
    pub scheduled: usize,
    pub late: usize,
    pub paid_on_time: usize,
    pub on_time_pct: f64,
    pub avg_days_late: f64,
}

/// Classify payment timeliness over the rows accepted by `window`.
///
/// The risk scorer passes a lease's full history, the health scorer an
/// org-wide trailing-30-day window, and the renewal ranker a per-lease
/// full history; the windows are deliberately not unified.
pub fn classify_timeliness<F>(rows: &[ScheduleRow], window: F) -> PaymentTimeliness
where
    F: Fn(&ScheduleRow) -> bool,
{
    let mut scheduled = 0usize;
    let mut late = 0usize;
    let mut paid_on_time = 0usize;
    let mut dated_settlements = 0usize;
    let mut days_late_total = 0i64;

    for row in rows.iter().filter(|row| window(row)) {
        scheduled += 1;
        if row.is_late() {
            late += 1;
        }
        if row.is_paid && !row.is_late() {
            paid_on_time += 1;
        }
        if row.is_paid {
            if let Some(paid_on) = row.paid_on {
                dated_settlements += 1;
                days_late_total += (paid_on - row.due_on).num_days().max(0);
            }
        }
    }

    let on_time_pct = if scheduled == 0 {
        100.0
    } else {
        (scheduled - late) as f64 / scheduled as f64 * 100.0
    };

    let avg_days_late = if dated_settlements == 0 {
        0.0
    } else {
        days_late_total as f64 / dated_settlements as f64
    };

    PaymentTimeliness {
        scheduled,
        late,
        paid_on_time,
        on_time_pct,
        avg_days_late,
    }
}

/// Window accepting every row; used for full-history classification.
pub fn full_history(_: &ScheduleRow) -> bool {
    true
}
