use std::fmt::Write;

use crate::metrics::{ProcessRow, Report};

use super::driver::RunOutcome;

pub fn process_table(rows: &[ProcessRow]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<8}{:<16}{:<9}{:<8}{:<8}{:<8}{:<12}{:<9}{}",
        "PID", "Name", "Arrival", "Burst", "Start", "Finish", "Turnaround", "Waiting", "Response"
    );
    let _ = writeln!(out, "{}", "-".repeat(86));
    for r in rows {
        let _ = writeln!(
            out,
            "{:<8}{:<16}{:<9}{:<8}{:<8}{:<8}{:<12}{:<9}{}",
            r.pid, r.name, r.arrival, r.burst, r.start, r.completion, r.turnaround, r.waiting, r.response
        );
    }
    out
}

pub fn summary(report: &Report) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Average Turnaround Time: {:.2} time units", report.avg_turnaround);
    let _ = writeln!(out, "Average Waiting Time:    {:.2} time units", report.avg_waiting);
    let _ = writeln!(out, "Average Response Time:   {:.2} time units", report.avg_response);
    let _ = writeln!(out, "CPU Utilization:         {:.2}%", report.cpu_utilization);
    let _ = writeln!(out, "Throughput:              {:.2} processes/time unit", report.throughput);
    let _ = writeln!(out, "Context Switches:        {}", report.context_switches);
    let _ = writeln!(out, "Fairness Index:          {:.2}", report.fairness_index);
    out
}

pub fn detailed(report: &Report) -> String {
    let mut out = summary(report);
    let _ = writeln!(out);
    let _ = writeln!(out, "Total Time:      {} time units", report.total_time);
    let _ = writeln!(out, "Total Idle Time: {} time units", report.idle_time);
    let _ = writeln!(out, "Total Processes: {}", report.total_processes);
    out
}

pub fn render(outcome: &RunOutcome, report: &Report, gantt: bool, verbose: bool) -> String {
    let mut out = format!(
        "=== {} Scheduling Results ===\n{}\n\n",
        outcome.policy,
        if outcome.preemptive { "Preemptive" } else { "Non-preemptive" }
    );
    out.push_str(&process_table(&report.processes));

    if gantt {
        let _ = write!(out, "\n=== Gantt Chart ===\n{}", outcome.trace.gantt_chart());
        if verbose {
            let _ = write!(out, "\n{}", outcome.trace);
        }
    }

    out.push_str("\n=== Performance Metrics Summary ===\n");
    out.push_str(&if verbose { detailed(report) } else { summary(report) });
    out
}

pub fn comparison(results: &[(String, Report)]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<8}{:>12}{:>10}{:>10}{:>8}{:>12}{:>10}{:>10}",
        "Policy", "Turnaround", "Waiting", "Response", "Util%", "Throughput", "Switches", "Fairness"
    );
    for (policy, r) in results {
        let _ = writeln!(
            out,
            "{:<8}{:>12.2}{:>10.2}{:>10.2}{:>8.1}{:>12.3}{:>10}{:>10.3}",
            policy,
            r.avg_turnaround,
            r.avg_waiting,
            r.avg_response,
            r.cpu_utilization,
            r.throughput,
            r.context_switches,
            r.fairness_index
        );
    }
    out
}
