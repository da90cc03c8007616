use super::*;
use genesis_shared::PatientPayload;
use rstest::rstest;

fn patient(n: u64) -> Patient {
    Patient::new(
        n.to_string(),
        PatientPayload {
            name: format!("Paciente {n}"),
            cpf: format!("{n:011}"),
            ..Default::default()
        },
    )
}

/// Server behaviour: a slice of `total` records, echoing the requested page.
fn server_page(req: &PageRequest, total: u64) -> PageResult<Patient> {
    let size = u64::from(req.page_size);
    let start = u64::from(req.page - 1) * size;
    let items = (start..total.min(start + size)).map(|n| patient(n + 1)).collect();
    PageResult {
        items,
        total,
        page: req.page,
        page_size: req.page_size,
    }
}

fn loaded(total: u64, page: u32) -> PatientListState {
    let mut state = PatientListState::new(8);
    let ticket = state.begin_fetch();
    state.apply(&ticket, Ok(server_page(&ticket.request, total)));
    if page > 1 {
        let ticket = state.go_to_page(page).unwrap();
        state.apply(&ticket, Ok(server_page(&ticket.request, total)));
    }
    state
}

#[test]
fn first_page_of_an_empty_collection_is_the_empty_state() {
    let mut state = PatientListState::new(8);
    let ticket = state.begin_fetch();
    assert!(state.loading());
    assert_eq!(ticket.request, PageRequest::new(1, 8, None));

    assert_eq!(
        state.apply(&ticket, Ok(PageResult::empty(8))),
        FetchOutcome::Applied
    );
    assert!(!state.loading());
    assert!(state.is_empty_state());
    assert_eq!(state.current_page(), 1);
    assert_eq!(state.visible_range(), (0, 0));
    assert!(!state.can_prev());
    assert!(!state.can_next());
}

#[rstest]
#[case(0, 1, 1)]
#[case(8, 1, 1)]
#[case(9, 2, 2)]
#[case(20, 3, 3)]
fn page_stays_within_bounds(#[case] total: u64, #[case] go_to: u32, #[case] expected: u32) {
    let mut state = loaded(total, 1);
    if let Some(ticket) = state.go_to_page(go_to) {
        state.apply(&ticket, Ok(server_page(&ticket.request, total)));
    }
    let _ = state.go_to_page(go_to + 10);
    assert_eq!(state.current_page(), expected);
    assert!(state.items().len() <= state.page_size() as usize);
    assert!(state.current_page() >= 1 && state.current_page() <= state.page_count());
}

#[test]
fn search_change_resets_to_first_page() {
    let mut state = loaded(30, 3);
    assert_eq!(state.current_page(), 3);

    let ticket = state.set_search("  Mar ").unwrap();
    assert_eq!(ticket.request.page, 1);
    assert_eq!(ticket.request.search.as_deref(), Some("Mar"));

    assert_eq!(state.set_search("Mar"), None);
}

#[test]
fn page_size_change_resets_to_first_page() {
    let mut state = loaded(30, 2);
    let ticket = state.set_page_size(20).unwrap();
    assert_eq!(ticket.request.page, 1);
    assert_eq!(ticket.request.page_size, 20);
    assert_eq!(state.set_page_size(20), None);
}

#[test]
fn only_the_latest_response_is_applied() {
    let mut state = loaded(30, 1);

    let slow = state.set_search("M").unwrap();
    let fast = state.set_search("Mar").unwrap();

    assert_eq!(
        state.apply(&fast, Ok(server_page(&fast.request, 2))),
        FetchOutcome::Applied
    );
    assert_eq!(
        state.apply(&slow, Ok(server_page(&slow.request, 30))),
        FetchOutcome::Stale
    );
    assert_eq!(state.total(), 2);
    assert_eq!(state.query().search.as_deref(), Some("Mar"));
}

#[test]
fn oversized_responses_are_truncated() {
    let mut state = PatientListState::new(5);
    let ticket = state.begin_fetch();
    let oversized = PageResult {
        items: (1..=9).map(patient).collect(),
        total: 9,
        page: 1,
        page_size: 9,
    };
    state.apply(&ticket, Ok(oversized));
    assert_eq!(state.items().len(), 5);
    assert_eq!(state.page_size(), 5);
}

#[test]
fn deleting_the_last_item_on_the_last_page_moves_back_one_page() {
    // 17 records, size 8: page 3 holds only record 17
    let mut state = loaded(17, 3);
    assert_eq!(state.items().len(), 1);

    assert!(state.begin_delete("17"));
    let reload = state.finish_delete("17", Ok(())).unwrap();
    assert_eq!(reload.request.page, 3);

    let outcome = state.apply(&reload, Ok(server_page(&reload.request, 16)));
    let FetchOutcome::Refetch(refetch) = outcome else {
        panic!("expected a refetch, got {outcome:?}");
    };
    assert_eq!(refetch.request.page, 2);

    assert_eq!(
        state.apply(&refetch, Ok(server_page(&refetch.request, 16))),
        FetchOutcome::Applied
    );
    assert_eq!(state.current_page(), 2);
    assert_eq!(state.visible_range(), (9, 16));
}

#[test]
fn deleting_the_only_record_yields_the_empty_state() {
    let mut state = loaded(1, 1);
    state.begin_delete("1");
    let reload = state.finish_delete("1", Ok(())).unwrap();
    assert_eq!(
        state.apply(&reload, Ok(server_page(&reload.request, 0))),
        FetchOutcome::Applied
    );
    assert!(state.is_empty_state());
    assert_eq!(state.current_page(), 1);
}

#[test]
fn server_clamped_page_is_adopted() {
    let mut state = loaded(20, 3);
    let ticket = state.reload();
    let mut clamped = server_page(&PageRequest::new(2, 8, None), 16);
    clamped.page = 2;
    state.apply(&ticket, Ok(clamped));
    assert_eq!(state.current_page(), 2);
}

#[test]
fn duplicate_deletes_are_refused_while_in_flight() {
    let mut state = loaded(5, 1);
    assert!(state.begin_delete("3"));
    assert!(!state.begin_delete("3"));
    assert!(state.is_deleting("3"));
    assert!(!state.is_deleting("4"));
}

#[test]
fn failed_delete_keeps_data_and_raises_a_notice() {
    let mut state = loaded(5, 1);
    let before = state.items().to_vec();

    state.begin_delete("2");
    let reload = state.finish_delete("2", Err(ApiError::Conflict(Some("Paciente possui exames".into()))));

    assert_eq!(reload, None);
    assert!(!state.is_deleting("2"));
    assert_eq!(state.items(), before.as_slice());
    assert_eq!(state.notice(), Some("Paciente possui exames"));

    state.dismiss_notice();
    assert_eq!(state.notice(), None);
}

#[test]
fn failed_fetch_keeps_prior_data_visible() {
    let mut state = loaded(12, 1);
    let ticket = state.next_page().unwrap();
    assert_eq!(
        state.apply(&ticket, Err(ApiError::Network("offline".into()))),
        FetchOutcome::Failed
    );
    assert!(!state.loading());
    assert_eq!(state.items().len(), 8);
    assert!(state.error().is_some());

    // a successful retry clears the error
    let retry = state.reload();
    state.apply(&retry, Ok(server_page(&retry.request, 12)));
    assert_eq!(state.error(), None);
    assert_eq!(state.items().len(), 4);
}

#[test]
fn unauthorized_is_never_shown_as_a_list_error() {
    let mut state = loaded(3, 1);
    let ticket = state.reload();
    state.apply(&ticket, Err(ApiError::Unauthorized));
    assert_eq!(state.error(), None);

    state.begin_delete("1");
    state.finish_delete("1", Err(ApiError::Unauthorized));
    assert_eq!(state.notice(), None);
}

#[test]
fn prev_and_next_respect_bounds() {
    let mut state = loaded(10, 1);
    assert_eq!(state.prev_page(), None);
    let next = state.next_page().unwrap();
    state.apply(&next, Ok(server_page(&next.request, 10)));
    assert_eq!(state.next_page(), None);
    assert!(state.can_prev());
    assert_eq!(state.visible_range(), (9, 10));
}

#[test]
fn failed_page_change_keeps_the_footer_on_the_rows_shown() {
    let mut state = loaded(17, 1);
    let ticket = state.next_page().unwrap();
    assert_eq!(ticket.request.page, 2);
    state.apply(&ticket, Err(ApiError::Network("offline".into())));

    assert_eq!(state.current_page(), 1);
    assert_eq!(state.visible_range(), (1, 8));
    assert_eq!(state.items()[0].id, "1");
    assert!(!state.can_prev());
    assert!(state.can_next());

    // the failed target is still the retry target
    assert_eq!(state.query().page, 2);
    let retry = state.go_to_page(2).unwrap();
    assert_eq!(retry.request.page, 2);
    state.apply(&retry, Ok(server_page(&retry.request, 17)));
    assert_eq!(state.current_page(), 2);
    assert_eq!(state.visible_range(), (9, 16));
}

#[test]
fn repeated_page_request_is_skipped_while_in_flight() {
    let mut state = loaded(17, 1);
    assert!(state.go_to_page(2).is_some());
    assert_eq!(state.go_to_page(2), None);
}

#[test]
fn page_buttons_are_windowed_and_absent_when_empty() {
    let state = loaded(0, 1);
    assert!(state.page_buttons().is_empty());
    assert!(!state.can_prev());
    assert!(!state.can_next());

    let state = loaded(200, 12);
    assert_eq!(state.page_count(), 25);
    assert_eq!(state.page_buttons(), vec![10, 11, 12, 13, 14]);
}
