use super::*;

const QUIET: Duration = Duration::from_millis(2000);

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[test]
fn single_edit_saves_after_quiet_period() {
    let t0 = Instant::now();
    let mut s = AutoSaveScheduler::new(QUIET);
    s.note_edit(t0);
    assert!(!s.poll(t0 + ms(1999)));
    assert!(s.poll(t0 + ms(2000)));
    assert!(!s.is_dirty());
}

#[test]
fn rapid_edits_produce_one_save() {
    let t0 = Instant::now();
    let mut s = AutoSaveScheduler::new(QUIET);
    s.note_edit(t0);
    s.note_edit(t0 + ms(500));
    assert!(!s.poll(t0 + ms(2100)));
    assert_eq!(s.next_deadline(), Some(t0 + ms(2500)));

    let mut saves = 0;
    for step in 0..10 {
        if s.poll(t0 + ms(2500 + step * 500)) {
            saves += 1;
        }
    }
    assert_eq!(saves, 1);
}

#[test]
fn flush_cancels_pending_deadline() {
    let t0 = Instant::now();
    let mut s = AutoSaveScheduler::new(QUIET);
    s.note_edit(t0);
    assert!(s.flush());
    assert!(s.next_deadline().is_none());
    assert!(!s.poll(t0 + ms(5000)));
}

#[test]
fn flush_without_edits_reports_clean() {
    let mut s = AutoSaveScheduler::new(QUIET);
    assert!(!s.flush());
}

#[test]
fn mark_dirty_makes_next_flush_save() {
    let t0 = Instant::now();
    let mut s = AutoSaveScheduler::new(QUIET);
    s.note_edit(t0);
    assert!(s.poll(t0 + QUIET));
    s.mark_dirty();
    assert!(s.next_deadline().is_none());
    assert!(s.flush());
}

#[test]
fn reset_discards_everything() {
    let t0 = Instant::now();
    let mut s = AutoSaveScheduler::new(QUIET);
    s.note_edit(t0);
    s.reset();
    assert!(!s.is_dirty());
    assert!(!s.poll(t0 + QUIET));
    assert!(!s.flush());
}
