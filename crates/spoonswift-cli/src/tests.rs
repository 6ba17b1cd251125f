use super::*;

use spoonswift_fetch::{AttemptOutcome, CycleError, FetchAttempt};

fn success_state() -> RequestState<String> {
    RequestState {
        status: Status::Success,
        attempts: 1,
        last_error: None,
        data: Some("20 restaurants".to_owned()),
        history: vec![
            FetchAttempt::now("relay-a", AttemptOutcome::Http(503)),
            FetchAttempt::now("relay-b", AttemptOutcome::Success),
        ],
    }
}

fn error_state() -> RequestState<String> {
    RequestState {
        status: Status::Error,
        attempts: 2,
        last_error: Some(CycleError {
            relays_tried: 3,
            last_outcome: Some(AttemptOutcome::Validation),
            message: "all 3 relays failed (last failure: validation failure)".to_owned(),
        }),
        data: None,
        history: vec![
            FetchAttempt::now("relay-a", AttemptOutcome::Validation),
            FetchAttempt::now("relay-b", AttemptOutcome::Validation),
            FetchAttempt::now("relay-c", AttemptOutcome::Validation),
        ],
    }
}

#[test]
fn report_prints_summary_on_success() {
    let result = report(success_state(), String::clone);
    assert!(result.is_ok());
}

#[test]
fn report_surfaces_cycle_error_message() {
    let err = report(error_state(), String::clone).unwrap_err();
    assert!(
        err.to_string().contains("3 relays"),
        "error must reference the relay count: {err}"
    );
}

#[test]
fn report_rejects_incomplete_state() {
    let state: RequestState<String> = RequestState {
        status: Status::Idle,
        attempts: 0,
        last_error: None,
        data: None,
        history: Vec::new(),
    };
    let err = report(state, String::clone).unwrap_err();
    assert!(err.to_string().contains("did not complete"), "{err}");
}
