use std::time::Duration;

use keytrace::app::{App, Exit};
use keytrace::clock::VirtualClock;
use keytrace::engine::scoring::RunResult;
use keytrace::error::InvalidOperation;
use keytrace::event::ScriptedBytes;
use keytrace::generator::word_source::WordSource;
use keytrace::session::controller::{Phase, RunOutcome, SessionController, SessionSettings};
use keytrace::session::input::{Action, DELETE, INTERRUPT};
use keytrace::ui::feedback::ActionLog;

type Controller = SessionController<ScriptedBytes, VirtualClock, ActionLog>;

fn controller(words: &[&str], count: usize) -> (Controller, VirtualClock) {
    let clock = VirtualClock::new();
    let source = WordSource::from_words(words.iter().map(|w| w.to_string()).collect()).unwrap();
    let settings = SessionSettings {
        word_count: count,
        seed: Some(11),
        ..SessionSettings::default()
    };
    let ctl = SessionController::new(
        source,
        settings,
        ScriptedBytes::new(clock.clone()),
        clock.clone(),
        ActionLog::default(),
    )
    .unwrap();
    (ctl, clock)
}

fn sampled_text(ctl: &mut Controller) -> Vec<u8> {
    ctl.new_sample().unwrap().to_string().into_bytes()
}

fn completed(outcome: RunOutcome) -> RunResult {
    match outcome {
        RunOutcome::Completed(result) => result,
        RunOutcome::Aborted => panic!("run was aborted"),
    }
}

/// First key at t=0, the rest evenly spread so the last lands at `total`.
fn type_evenly(ctl: &mut Controller, bytes: &[u8], total: Duration) {
    let gaps = u32::try_from(bytes.len() - 1).unwrap();
    let input = ctl.input_mut();
    input.push_bytes(&bytes[..1]);
    input.push_paced(total / gaps, &bytes[1..]);
}

#[test]
fn clean_run_over_two_words_in_twelve_seconds() {
    let (mut ctl, _) = controller(&["cat", "dog"], 2);
    let text = sampled_text(&mut ctl);
    type_evenly(&mut ctl, &text, Duration::from_secs(12));

    let result = completed(ctl.start_run().unwrap());
    assert!((result.elapsed_secs - 12.0).abs() < 1e-9);
    assert_eq!(result.total_chars, 6);
    assert_eq!(result.correct_chars, 6);
    assert!((result.adjusted_wpm - 6.0).abs() < 1e-9);
    assert!((result.raw_wpm - 6.0).abs() < 1e-9);
    assert!(
        ctl.feedback()
            .last_run()
            .iter()
            .all(|a| matches!(a, Action::Matched(_)))
    );
    assert!((ctl.best_wpm() - 6.0).abs() < 1e-9);
}

#[test]
fn one_mismatch_lowers_adjusted_but_not_raw() {
    let (mut ctl, _) = controller(&["cat", "dog"], 2);
    let mut text = sampled_text(&mut ctl);
    let expected = char::from(text[4]);
    text[4] = b'f';
    type_evenly(&mut ctl, &text, Duration::from_secs(12));

    let result = completed(ctl.start_run().unwrap());
    assert_eq!(result.correct_chars, 5);
    assert!((result.adjusted_wpm - 5.0).abs() < 1e-9);
    assert!((result.raw_wpm - 6.0).abs() < 1e-9);
    assert_eq!(ctl.feedback().last_run()[4], Action::Mismatched(expected));
}

#[test]
fn backspace_at_start_changes_nothing() {
    let (mut ctl, _) = controller(&["cat"], 1);
    ctl.input_mut()
        .push_bytes(&[DELETE, DELETE])
        .push_paced(Duration::from_secs(1), b"cat");
    let result = completed(ctl.start_run().unwrap());
    assert_eq!(result.correct_chars, 3);
    let run = ctl.feedback().last_run();
    assert_eq!(
        run[0],
        Action::Edited {
            revealed: 'c',
            moved: false
        }
    );
    // Both no-op edits are still keystrokes of the run.
    assert_eq!(ctl.state().last_log.as_ref().unwrap().len(), 5);
}

#[test]
fn replay_reproduces_live_actions_and_result() {
    let (mut ctl, _) = controller(&["hello", "there"], 2);
    let text = sampled_text(&mut ctl);
    let input = ctl.input_mut();
    input
        .push_after(Duration::ZERO, text[0])
        .push_after(Duration::from_millis(300), b'q')
        .push_after(Duration::from_millis(400), 0x1b)
        .push_after(Duration::from_millis(100), DELETE)
        .push_paced(Duration::from_millis(250), &text[1..6])
        .push_after(Duration::from_millis(900), b'z')
        .push_paced(Duration::from_millis(180), &text[7..]);

    let live = completed(ctl.start_run().unwrap());
    let replayed = completed(ctl.replay().unwrap());

    let log = ctl.feedback();
    assert_eq!(log.runs.len(), 2);
    assert_eq!(log.replays, vec![false, true]);
    let live_actions: Vec<&Action> = log.runs[0].iter().filter(|a| **a != Action::Ignored).collect();
    let replay_actions: Vec<&Action> = log.runs[1].iter().collect();
    assert_eq!(live_actions, replay_actions);
    assert_eq!(live, replayed);
    assert_eq!(ctl.phase(), Phase::AwaitingDecision);
}

#[test]
fn replay_sleeps_reproduce_recorded_gaps() {
    let (mut ctl, clock) = controller(&["cat"], 1);
    ctl.input_mut()
        .push_after(Duration::from_secs(5), b'c')
        .push_after(Duration::from_millis(500), b'a')
        .push_after(Duration::ZERO, b't');
    completed(ctl.start_run().unwrap());
    assert!(clock.sleeps().is_empty());

    completed(ctl.replay().unwrap());
    assert_eq!(
        clock.sleeps(),
        vec![Duration::ZERO, Duration::from_millis(500), Duration::ZERO]
    );
}

#[test]
fn chained_replays_reuse_original_timings() {
    let (mut ctl, clock) = controller(&["dog"], 1);
    ctl.input_mut()
        .push_bytes(b"d")
        .push_after(Duration::from_millis(700), b'o')
        .push_after(Duration::from_millis(1300), b'g');
    let original_log = {
        completed(ctl.start_run().unwrap());
        ctl.state().last_log.clone().unwrap()
    };

    completed(ctl.replay().unwrap());
    let first = clock.sleeps();
    clock.clear_sleeps();
    completed(ctl.replay().unwrap());
    assert_eq!(clock.sleeps(), first);
    assert_eq!(ctl.state().last_log.as_ref().unwrap(), &original_log);
    assert_eq!(ctl.state().completed_runs, 3);
}

#[test]
fn best_survives_slower_rerun_on_same_sample() {
    let (mut ctl, _) = controller(&["cat", "dog", "emu"], 2);
    let text = sampled_text(&mut ctl);
    type_evenly(&mut ctl, &text, Duration::from_secs(6));
    let fast = completed(ctl.start_run().unwrap());

    type_evenly(&mut ctl, &text, Duration::from_secs(30));
    let slow = completed(ctl.start_run().unwrap());
    assert!(slow.adjusted_wpm < fast.adjusted_wpm);
    assert!((ctl.best_wpm() - fast.adjusted_wpm).abs() < 1e-9);
    assert_eq!(ctl.target().unwrap().to_string().into_bytes(), text);
}

#[test]
fn replay_before_any_run_is_reported_not_fatal() {
    let (mut ctl, _) = controller(&["cat"], 1);
    ctl.new_sample().unwrap();
    let err = ctl.replay().unwrap_err();
    assert_eq!(
        err.downcast_ref::<InvalidOperation>(),
        Some(&InvalidOperation::NoPriorRun)
    );
    assert_eq!(ctl.phase(), Phase::Idle);
}

#[test]
fn app_runs_then_replays_then_quits() {
    let (mut ctl, _) = controller(&["cat"], 1);
    ctl.input_mut()
        .push_paced(Duration::from_secs(1), b"cat")
        .push_bytes(b"xrq");
    let mut app = App::new(ctl, Vec::new());
    assert_eq!(app.run().unwrap(), Exit::Quit);

    let (ctl, out) = app.into_parts();
    assert_eq!(ctl.feedback().replays, vec![false, true]);
    let screen = String::from_utf8(out).unwrap();
    assert!(screen.contains("[r] replay"));
    assert!(screen.contains("raw wpm:"));
}

#[test]
fn app_reports_bad_sample_size_and_continues() {
    let (mut ctl, _) = controller(&["cat", "dog"], 1);
    ctl.input_mut()
        .push_paced(Duration::from_secs(1), b"abc")
        .push_bytes(b"c9\r")
        .push_bytes(b"q");
    let mut app = App::new(ctl, Vec::new());
    assert_eq!(app.run().unwrap(), Exit::Quit);

    let (ctl, out) = app.into_parts();
    let screen = String::from_utf8(out).unwrap();
    assert!(screen.contains("sample size 9 is out of range (1..=2)"));
    assert_eq!(ctl.word_count(), 1);
}

#[test]
fn app_change_sample_size_starts_new_run() {
    let (mut ctl, _) = controller(&["cat", "dog"], 1);
    ctl.input_mut()
        .push_paced(Duration::from_secs(1), b"xyz")
        .push_bytes(b"c2\r")
        .push_bytes(&[INTERRUPT]);
    let mut app = App::new(ctl, Vec::new());
    assert_eq!(app.run().unwrap(), Exit::Abort);

    let (ctl, _) = app.into_parts();
    assert_eq!(ctl.word_count(), 2);
    assert_eq!(ctl.target().unwrap().word_count(), 2);
    assert_eq!(ctl.phase(), Phase::Terminated);
    assert_eq!(ctl.best_wpm(), 0.0);
}

#[test]
fn app_interrupt_mid_run_aborts() {
    let (mut ctl, _) = controller(&["cat"], 1);
    ctl.input_mut().push_bytes(&[b'c', INTERRUPT]);
    let mut app = App::new(ctl, Vec::new());
    assert_eq!(app.run().unwrap(), Exit::Abort);
}
