use chrono::{DateTime, TimeZone};

use crate::commands::CmdResult;
use crate::error::Result;
use crate::model::Task;
use crate::stats::{detailed_stats, stats};

pub fn run<Tz: TimeZone>(tasks: &[Task], detailed: bool, now: &DateTime<Tz>) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    if detailed {
        let d = detailed_stats(tasks, now);
        result.stats = Some(d.summary);
        result.detailed_stats = Some(d);
    } else {
        result.stats = Some(stats(tasks));
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TaskDraft;
    use chrono::Utc;

    #[test]
    fn basic_and_detailed() {
        let mut tasks = vec![
            Task::from_draft(TaskDraft::new("A")),
            Task::from_draft(TaskDraft::new("B")),
        ];
        tasks[0].is_completed = true;

        let basic = run(&tasks, false, &Utc::now()).unwrap();
        assert_eq!(basic.stats.unwrap().completion_rate, 50);
        assert!(basic.detailed_stats.is_none());

        let detailed = run(&tasks, true, &Utc::now()).unwrap();
        assert_eq!(detailed.stats, Some(detailed.detailed_stats.as_ref().unwrap().summary));
        assert_eq!(detailed.detailed_stats.unwrap().by_priority.medium, 2);
    }
}
