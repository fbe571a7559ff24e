use llm_profile::trial::RunOutcome;

/// Failures listed individually before the rest are collapsed.
const MAX_LISTED_FAILURES: usize = 5;

pub fn print_summary(outcome: &RunOutcome) {
    print!("{}", render_summary(outcome));
}

fn render_summary(outcome: &RunOutcome) -> String {
    let summary = &outcome.metrics.summary;
    let report = &outcome.report;
    let mut out = String::from("Results Summary\n");
    out.push_str(&format!("  Total trials:       {}\n", summary.total));
    out.push_str(&format!("  Correct responses:  {}\n", summary.correct_count));
    out.push_str(&format!(
        "  Success rate:       {:.2}%\n",
        summary.correct_percentage()
    ));
    out.push_str(&format!("  Failed trials:      {}\n", report.failed()));
    if summary.total > 0 {
        out.push_str(&format!(
            "  Latency (s):        mean {:.3}  min {:.3}  max {:.3}\n",
            summary.mean_response_secs, summary.min_response_secs, summary.max_response_secs
        ));
    }
    out.push_str(&format!(
        "  Started:            {}\n",
        report.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out.push_str(&format!(
        "  Elapsed:            {:.2}s\n",
        report.elapsed.as_secs_f64()
    ));

    for failure in report.failures.iter().take(MAX_LISTED_FAILURES) {
        out.push_str(&format!(
            "  ! trial {}: {}\n",
            failure.trial_index, failure.error
        ));
    }
    if report.failed() > MAX_LISTED_FAILURES {
        out.push_str(&format!(
            "  ... and {} more failures (see log)\n",
            report.failed() - MAX_LISTED_FAILURES
        ));
    }
    out
}
