//! 提交资格与活动分栏
//!
//! 所有函数都是纯函数，`now` 由调用方传入。截止时间是硬性截止：
//! 恰好在截止时刻提交仍然有效，晚于截止时刻一秒即不能再提交。

use chrono::{DateTime, Duration, Utc};
use std::cmp::Ordering;

use crate::errors::{PortalError, Result};
use crate::models::{
    Activity, ActivityTab, ActivityType, StudentActivity, Submission, SubmissionStatus, TabCounts,
    TabFilter, Tone,
};

/// 即将截止的提醒窗口（小时）
pub const DUE_SOON_WINDOW_HOURS: i64 = 24;

/// 检查能否新建提交，不能时给出原因
///
/// `submissions` 为该学生在该活动下已有的全部提交。
pub fn check_eligibility(
    activity: &Activity,
    submissions: &[Submission],
    now: DateTime<Utc>,
) -> Result<()> {
    if !activity.activity_type.accepts_submissions() {
        return Err(PortalError::not_eligible(format!(
            "activity {} is an announcement and does not accept submissions",
            activity.id
        )));
    }

    if let Some(limit) = activity.attempt_limit()
        && submissions.len() >= limit as usize
    {
        return Err(PortalError::not_eligible(format!(
            "maximum attempts reached for activity {} ({}/{})",
            activity.id,
            submissions.len(),
            limit
        )));
    }

    if is_past_due(activity, now) {
        return Err(PortalError::not_eligible(format!(
            "activity {} closed for submissions",
            activity.id
        )));
    }

    Ok(())
}

/// 能否新建提交
pub fn can_submit(activity: &Activity, submissions: &[Submission], now: DateTime<Utc>) -> bool {
    check_eligibility(activity, submissions, now).is_ok()
}

/// 当前时间是否已严格晚于截止时间
pub fn is_past_due(activity: &Activity, now: DateTime<Utc>) -> bool {
    activity.due_date.is_some_and(|due| now > due)
}

/// 是否逾期：已有提交或未设截止时间时恒为 false
pub fn is_overdue(activity: &Activity, has_submission: bool, now: DateTime<Utc>) -> bool {
    !has_submission && is_past_due(activity, now)
}

/// 活动归入哪个分栏
///
/// 既没有提交、也未逾期、又不可提交的活动（公告）不属于任何分栏，返回 `None`。
pub fn classify(
    activity: &Activity,
    submission: Option<&Submission>,
    now: DateTime<Utc>,
) -> Option<ActivityTab> {
    if submission.is_some() {
        return Some(ActivityTab::Submitted);
    }
    if is_overdue(activity, false, now) {
        return Some(ActivityTab::Overdue);
    }
    if can_submit(activity, &[], now) {
        return Some(ActivityTab::Pending);
    }
    None
}

/// 截止时间紧迫程度
pub fn urgency(activity: &Activity, now: DateTime<Utc>) -> Tone {
    let Some(due) = activity.due_date else {
        return Tone::Primary;
    };
    if now > due {
        Tone::Danger
    } else if due - now <= Duration::hours(DUE_SOON_WINDOW_HOURS) {
        Tone::Warning
    } else {
        Tone::Primary
    }
}

/// 列表项的强调色：有提交时按提交状态，否则按截止紧迫程度
pub fn status_tone(entry: &StudentActivity, now: DateTime<Utc>) -> Tone {
    match entry.submission.as_ref().map(|s| s.status) {
        Some(SubmissionStatus::Submitted) => Tone::Info,
        Some(SubmissionStatus::Graded) => Tone::Success,
        Some(SubmissionStatus::Returned) => Tone::Warning,
        None => urgency(&entry.activity, now),
    }
}

/// 学生是否能看到该活动：已发布且在开放时间窗口内
pub fn is_visible(activity: &Activity, now: DateTime<Utc>) -> bool {
    activity.is_published
        && activity.available_from.is_none_or(|from| now >= from)
        && activity.available_until.is_none_or(|until| now <= until)
}

/// 按分栏与活动类型过滤
pub fn filter_activities<'a>(
    entries: &'a [StudentActivity],
    tab: TabFilter,
    activity_type: Option<ActivityType>,
    now: DateTime<Utc>,
) -> Vec<&'a StudentActivity> {
    entries
        .iter()
        .filter(|e| activity_type.is_none_or(|t| e.activity.activity_type == t))
        .filter(|e| tab.matches(classify(&e.activity, e.submission.as_ref(), now)))
        .collect()
}

/// 统计各分栏数量
pub fn tab_counts(entries: &[StudentActivity], now: DateTime<Utc>) -> TabCounts {
    let mut counts = TabCounts::default();
    for entry in entries {
        match classify(&entry.activity, entry.submission.as_ref(), now) {
            Some(ActivityTab::Pending) => counts.pending += 1,
            Some(ActivityTab::Submitted) => counts.submitted += 1,
            Some(ActivityTab::Overdue) => counts.overdue += 1,
            None => {}
        }
    }
    counts
}

/// 按截止时间升序排列，未设截止时间的排在最后，相同时按 id
pub fn sort_by_due_date(entries: &mut [StudentActivity]) {
    entries.sort_by(|a, b| {
        match (a.activity.due_date, b.activity.due_date) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
        .then(a.activity.id.cmp(&b.activity.id))
    });
}

/// 某学生某活动的当前提交（尝试序号最大的一次）
pub fn current_submission(
    submissions: &[Submission],
    student_id: i64,
    activity_id: i64,
) -> Option<&Submission> {
    submissions
        .iter()
        .filter(|s| s.student_id == student_id && s.activity_id == activity_id)
        .max_by_key(|s| s.recency())
}

/// 剩余尝试次数，`None` 表示不限
pub fn remaining_attempts(activity: &Activity, submissions: &[Submission]) -> Option<u32> {
    activity
        .attempt_limit()
        .map(|limit| limit.saturating_sub(submissions.len() as u32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{activity, at, submission};

    #[test]
    fn test_announcement_never_submittable() {
        let mut a = activity(1);
        a.activity_type = ActivityType::Announcement;
        a.attempts_allowed = -1;
        assert!(!can_submit(&a, &[], at(2020, 1, 1, 0, 0, 0)));
        a.due_date = Some(at(2030, 1, 1, 0, 0, 0));
        assert!(!can_submit(&a, &[], at(2020, 1, 1, 0, 0, 0)));

        let err = check_eligibility(&a, &[], at(2020, 1, 1, 0, 0, 0)).unwrap_err();
        assert_eq!(err.code(), "E002");
    }

    #[test]
    fn test_attempt_cap() {
        let now = at(2024, 1, 1, 0, 0, 0);
        let mut a = activity(1);
        a.attempts_allowed = 2;
        let one = vec![submission(1, 1, 9, 1)];
        let two = vec![submission(1, 1, 9, 1), submission(2, 1, 9, 2)];
        assert!(can_submit(&a, &[], now));
        assert!(can_submit(&a, &one, now));
        assert!(!can_submit(&a, &two, now));
        assert_eq!(remaining_attempts(&a, &one), Some(1));
        assert_eq!(remaining_attempts(&a, &two), Some(0));
    }

    #[test]
    fn test_unlimited_attempts() {
        let now = at(2024, 1, 1, 0, 0, 0);
        let a = activity(1);
        let many: Vec<_> = (1..=50).map(|n| submission(n, 1, 9, n as u32)).collect();
        assert!(can_submit(&a, &many, now));
        assert_eq!(remaining_attempts(&a, &many), None);
    }

    #[test]
    fn test_zero_attempts_allows_nothing() {
        let mut a = activity(1);
        a.attempts_allowed = 0;
        assert!(!can_submit(&a, &[], at(2024, 1, 1, 0, 0, 0)));
    }

    #[test]
    fn test_due_date_is_hard_cutoff() {
        let mut a = activity(1);
        a.due_date = Some(at(2024, 1, 10, 0, 0, 0));
        assert!(can_submit(&a, &[], at(2024, 1, 9, 23, 59, 59)));
        assert!(can_submit(&a, &[], at(2024, 1, 10, 0, 0, 0)));
        assert!(!can_submit(&a, &[], at(2024, 1, 10, 0, 0, 1)));
    }

    #[test]
    fn test_is_overdue() {
        let mut a = activity(1);
        let late = at(2024, 2, 1, 0, 0, 0);
        assert!(!is_overdue(&a, false, late));
        a.due_date = Some(at(2024, 1, 10, 0, 0, 0));
        assert!(is_overdue(&a, false, late));
        assert!(!is_overdue(&a, true, late));
        assert!(!is_overdue(&a, false, at(2024, 1, 10, 0, 0, 0)));
    }

    #[test]
    fn test_classify() {
        let mut a = activity(1);
        a.due_date = Some(at(2024, 1, 10, 0, 0, 0));
        let before = at(2024, 1, 5, 0, 0, 0);
        let after = at(2024, 1, 11, 0, 0, 0);
        let s = submission(1, 1, 9, 1);

        assert_eq!(classify(&a, None, before), Some(ActivityTab::Pending));
        assert_eq!(classify(&a, None, after), Some(ActivityTab::Overdue));
        assert_eq!(classify(&a, Some(&s), after), Some(ActivityTab::Submitted));

        let mut announcement = activity(2);
        announcement.activity_type = ActivityType::Announcement;
        assert_eq!(classify(&announcement, None, before), None);
    }

    #[test]
    fn test_urgency_tiers() {
        let mut a = activity(1);
        let now = at(2024, 1, 10, 0, 0, 0);
        assert_eq!(urgency(&a, now), Tone::Primary);

        a.due_date = Some(at(2024, 1, 11, 0, 0, 0));
        assert_eq!(urgency(&a, now), Tone::Warning); // 恰好 24 小时

        a.due_date = Some(at(2024, 1, 11, 0, 0, 1));
        assert_eq!(urgency(&a, now), Tone::Primary);

        a.due_date = Some(at(2024, 1, 10, 0, 0, 0));
        assert_eq!(urgency(&a, now), Tone::Warning);

        a.due_date = Some(at(2024, 1, 9, 23, 59, 59));
        assert_eq!(urgency(&a, now), Tone::Danger);
    }

    #[test]
    fn test_status_tone_prefers_submission_state() {
        let mut a = activity(1);
        a.due_date = Some(at(2024, 1, 1, 0, 0, 0));
        let now = at(2024, 2, 1, 0, 0, 0);
        let mut s = submission(1, 1, 9, 1);

        let entry = StudentActivity::new(a.clone(), None);
        assert_eq!(status_tone(&entry, now), Tone::Danger);

        let entry = StudentActivity::new(a.clone(), Some(s.clone()));
        assert_eq!(status_tone(&entry, now), Tone::Info);

        s.status = SubmissionStatus::Returned;
        let entry = StudentActivity::new(a, Some(s));
        assert_eq!(status_tone(&entry, now), Tone::Warning);
    }

    #[test]
    fn test_visibility_window() {
        let mut a = activity(1);
        let now = at(2024, 1, 5, 0, 0, 0);
        assert!(is_visible(&a, now));

        a.available_from = Some(at(2024, 1, 6, 0, 0, 0));
        assert!(!is_visible(&a, now));

        a.available_from = Some(at(2024, 1, 1, 0, 0, 0));
        a.available_until = Some(at(2024, 1, 4, 0, 0, 0));
        assert!(!is_visible(&a, now));

        a.available_until = None;
        a.is_published = false;
        assert!(!is_visible(&a, now));
    }

    #[test]
    fn test_filter_and_counts() {
        let now = at(2024, 1, 10, 0, 0, 0);
        let mut pending = activity(1);
        pending.due_date = Some(at(2024, 1, 20, 0, 0, 0));
        let mut overdue = activity(2);
        overdue.due_date = Some(at(2024, 1, 1, 0, 0, 0));
        let mut quiz = activity(3);
        quiz.activity_type = ActivityType::Quiz;
        let mut announcement = activity(4);
        announcement.activity_type = ActivityType::Announcement;

        let entries = vec![
            StudentActivity::new(pending, None),
            StudentActivity::new(overdue, None),
            StudentActivity::new(quiz, Some(submission(1, 3, 9, 1))),
            StudentActivity::new(announcement, None),
        ];

        let counts = tab_counts(&entries, now);
        assert_eq!(
            counts,
            TabCounts {
                pending: 1,
                submitted: 1,
                overdue: 1
            }
        );

        let ids = |v: Vec<&StudentActivity>| v.iter().map(|e| e.activity.id).collect::<Vec<_>>();
        assert_eq!(ids(filter_activities(&entries, TabFilter::Pending, None, now)), vec![1]);
        assert_eq!(ids(filter_activities(&entries, TabFilter::Overdue, None, now)), vec![2]);
        assert_eq!(ids(filter_activities(&entries, TabFilter::All, None, now)), vec![1, 2, 3, 4]);
        assert_eq!(
            ids(filter_activities(&entries, TabFilter::All, Some(ActivityType::Quiz), now)),
            vec![3]
        );
        assert!(
            filter_activities(&entries, TabFilter::Pending, Some(ActivityType::Quiz), now)
                .is_empty()
        );
    }

    #[test]
    fn test_sort_by_due_date() {
        let mut a = activity(3);
        a.due_date = Some(at(2024, 3, 1, 0, 0, 0));
        let b = activity(1);
        let mut c = activity(2);
        c.due_date = Some(at(2024, 2, 1, 0, 0, 0));
        let mut entries = vec![
            StudentActivity::new(a, None),
            StudentActivity::new(b, None),
            StudentActivity::new(c, None),
        ];
        sort_by_due_date(&mut entries);
        let ids: Vec<_> = entries.iter().map(|e| e.activity.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_current_submission_picks_latest_attempt() {
        let subs = vec![
            submission(1, 7, 9, 1),
            submission(2, 7, 9, 3),
            submission(3, 7, 9, 2),
            submission(4, 7, 10, 5),
            submission(5, 8, 9, 9),
        ];
        assert_eq!(current_submission(&subs, 9, 7).and_then(|s| s.id), Some(2));
        assert_eq!(current_submission(&subs, 11, 7), None);
    }
}
