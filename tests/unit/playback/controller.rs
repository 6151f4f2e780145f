use super::*;
use crate::foundation::core::Phase;
use crate::queue::model::AnimationInstance;
use crate::test_support::{Call, CountingSplitter, FixedResolver, RecordingRuntime};
use serde_json::{Value, json};
use std::cell::RefCell;
use std::rc::Rc;

type Ctl = PlaybackController<RecordingRuntime>;
type Host = PlaybackHost<RecordingRuntime>;

fn inst(category: &str, params: Value) -> AnimationInstance {
    let mut inst = AnimationInstance {
        preset_id: "p".to_owned(),
        name: "P".to_owned(),
        category: category.to_owned(),
        parameters: params.as_object().cloned().unwrap(),
        direction: None,
        transform_origin: None,
        easing: None,
    };
    inst.sanitize();
    inst
}

fn entrance(duration: f64) -> AnimationQueue {
    let mut q = AnimationQueue::default();
    q.set_phase(
        Phase::Entrance,
        vec![inst("basic", json!({ "duration": duration, "opacity": [0, 1] }))],
    );
    q
}

fn setup(queue: AnimationQueue, opts: PlaybackOpts) -> (Ctl, Host, RecordingRuntime) {
    let rt = RecordingRuntime::default();
    let host = PlaybackHost::new(rt.clone(), FixedResolver::default());
    let ctl = PlaybackController::new("box".into(), SubjectKind::Element, queue, opts);
    (ctl, host, rt)
}

fn manual() -> PlaybackOpts {
    PlaybackOpts {
        autoplay: false,
        ..PlaybackOpts::default()
    }
}

fn record(ctl: &mut Ctl) -> Rc<RefCell<Vec<PlaybackTick>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    ctl.subscribe(move |t| sink.borrow_mut().push(t));
    seen
}

fn timelines(rt: &RecordingRuntime) -> usize {
    rt.count(|c| *c == Call::CreateTimeline)
}

fn blocked() -> HostSignals {
    HostSignals {
        ready: true,
        blocked: true,
    }
}

#[test]
fn visible_subject_autoplays_when_ready() {
    let (mut ctl, mut host, rt) = setup(entrance(500.0), PlaybackOpts::default());
    assert_eq!(ctl.state(), PlaybackState::Idle);
    assert_eq!(ctl.cache_state(), CacheState::Absent);

    ctl.set_visible(&mut host, true, HostSignals::default());
    assert_eq!(ctl.state(), PlaybackState::Playing);
    assert_eq!(ctl.cache_state(), CacheState::Compiled);
    assert!(ctl.is_frame_scheduled());
    assert_eq!(timelines(&rt), 1);
}

#[test]
fn armed_subject_waits_for_ready() {
    let (mut ctl, mut host, _rt) = setup(entrance(500.0), PlaybackOpts::default());
    let not_ready = HostSignals {
        ready: false,
        blocked: false,
    };
    ctl.set_visible(&mut host, true, not_ready);
    assert_eq!(ctl.state(), PlaybackState::Armed);

    ctl.update_signals(&mut host, HostSignals::default());
    assert_eq!(ctl.state(), PlaybackState::Playing);
}

#[test]
fn leaving_the_viewport_disarms_or_pauses() {
    let not_ready = HostSignals {
        ready: false,
        blocked: false,
    };
    let (mut ctl, mut host, _rt) = setup(entrance(500.0), PlaybackOpts::default());
    ctl.set_visible(&mut host, true, not_ready);
    ctl.set_visible(&mut host, false, not_ready);
    assert_eq!(ctl.state(), PlaybackState::Idle);

    ctl.set_visible(&mut host, true, HostSignals::default());
    ctl.set_visible(&mut host, false, HostSignals::default());
    assert_eq!(ctl.state(), PlaybackState::Paused);
    assert!(!ctl.is_frame_scheduled());
}

#[test]
fn autoplay_off_stays_idle_until_play() {
    let (mut ctl, mut host, _rt) = setup(entrance(500.0), manual());
    ctl.set_visible(&mut host, true, HostSignals::default());
    assert_eq!(ctl.state(), PlaybackState::Idle);
    ctl.play(&mut host);
    assert_eq!(ctl.state(), PlaybackState::Playing);
}

#[test]
fn ticks_advance_and_complete() {
    let (mut ctl, mut host, rt) = setup(entrance(500.0), manual());
    let seen = record(&mut ctl);
    ctl.play(&mut host);

    assert_eq!(ctl.tick(1000.0).map(|t| t.current_time_ms), Some(0.0));
    assert_eq!(ctl.tick(1200.0).map(|t| t.current_time_ms), Some(200.0));
    assert!(rt.calls().contains(&Call::Seek(0.2)));

    let last = ctl.tick(1700.0).unwrap();
    assert_eq!(last.current_time_ms, 500.0);
    assert!(!last.is_playing);
    assert_eq!(ctl.state(), PlaybackState::Completed);
    assert!(!ctl.is_frame_scheduled());
    assert_eq!(ctl.tick(1800.0), None);

    let seen = seen.borrow();
    assert_eq!(seen.first().map(|t| t.is_playing), Some(true));
    assert_eq!(seen.last(), Some(&last));
}

#[test]
fn loop_preview_wraps_to_start() {
    let opts = PlaybackOpts {
        autoplay: false,
        loop_preview: true,
    };
    let (mut ctl, mut host, _rt) = setup(entrance(500.0), opts);
    ctl.play(&mut host);
    ctl.tick(0.0);
    let t = ctl.tick(900.0).unwrap();
    assert_eq!(t.current_time_ms, 0.0);
    assert!(t.is_playing);
    assert_eq!(ctl.state(), PlaybackState::Playing);
    assert_eq!(ctl.tick(1000.0).map(|t| t.current_time_ms), Some(100.0));
}

#[test]
fn finite_emphasis_loops_play_through_to_the_exit() {
    let mut q = AnimationQueue::default();
    q.set_phase(
        Phase::Emphasis,
        vec![inst("basic", json!({ "duration": 500, "loop": 3, "scale": [1, 1.1] }))],
    );
    q.set_phase(
        Phase::Exit,
        vec![inst("basic", json!({ "duration": 250, "opacity": [1, 0] }))],
    );
    let (mut ctl, mut host, rt) = setup(q, manual());
    ctl.play(&mut host);
    ctl.tick(0.0);

    ctl.tick(1000.0);
    assert_eq!(ctl.state(), PlaybackState::Playing);
    ctl.tick(1600.0);
    assert_eq!(ctl.state(), PlaybackState::Playing);
    assert!(rt.calls().contains(&Call::Seek(1.6)));

    let last = ctl.tick(2000.0).unwrap();
    assert!(!last.is_playing);
    assert_eq!(ctl.state(), PlaybackState::Completed);
    assert!(rt.calls().contains(&Call::Seek(1.75)));
    assert_eq!(last.current_time_ms, ctl.total_duration_ms());
}

#[test]
fn text_stagger_plays_until_the_last_character() {
    let mut q = AnimationQueue::default();
    q.set_phase(
        Phase::Entrance,
        vec![inst("text", json!({ "duration": 500, "delay": 125, "opacity": [0, 1] }))],
    );
    let rt = RecordingRuntime::default();
    let mut host = PlaybackHost::new(rt.clone(), FixedResolver::default())
        .with_splitter(CountingSplitter::new(4));
    let mut ctl: Ctl = PlaybackController::new("t".into(), SubjectKind::Element, q, manual());

    ctl.play(&mut host);
    ctl.tick(0.0);
    ctl.tick(700.0);
    assert_eq!(ctl.state(), PlaybackState::Playing);
    assert!(rt.calls().contains(&Call::Seek(0.7)));

    ctl.tick(1000.0);
    assert_eq!(ctl.state(), PlaybackState::Completed);
    assert!(rt.calls().contains(&Call::Seek(0.875)));
}

#[test]
fn infinite_emphasis_keeps_playing_with_clamped_time() {
    let mut q = entrance(500.0);
    q.set_phase(
        Phase::Emphasis,
        vec![inst("basic", json!({ "duration": 1000, "loop": true, "scale": [1, 1.05, 1] }))],
    );
    q.set_phase(
        Phase::Exit,
        vec![inst("basic", json!({ "duration": 300, "opacity": [1, 0] }))],
    );
    let (mut ctl, mut host, rt) = setup(q, manual());
    assert_eq!(ctl.total_duration_ms(), 1500.0);

    ctl.play(&mut host);
    ctl.tick(0.0);
    let t = ctl.tick(5000.0).unwrap();
    assert_eq!(t.current_time_ms, 1500.0);
    assert!(t.is_playing);
    assert_eq!(ctl.state(), PlaybackState::Playing);
    assert!(rt.calls().contains(&Call::Seek(5.0)));
}

#[test]
fn blocking_pauses_and_resumes_from_same_progress() {
    let (mut ctl, mut host, rt) = setup(entrance(500.0), manual());
    ctl.play(&mut host);
    ctl.tick(0.0);
    ctl.tick(250.0);

    ctl.update_signals(&mut host, blocked());
    assert_eq!(ctl.state(), PlaybackState::Paused);
    assert!(!ctl.is_frame_scheduled());
    assert_eq!(ctl.tick(400.0), None);
    assert_eq!(ctl.current_time_ms(), 250.0);

    ctl.update_signals(&mut host, HostSignals::default());
    assert_eq!(ctl.state(), PlaybackState::Playing);
    assert_eq!(ctl.current_time_ms(), 250.0);
    assert_eq!(timelines(&rt), 1);

    ctl.tick(1000.0);
    assert_eq!(ctl.tick(1100.0).map(|t| t.current_time_ms), Some(350.0));
}

#[test]
fn unblocking_at_zero_restarts() {
    let (mut ctl, mut host, rt) = setup(entrance(500.0), manual());
    ctl.play(&mut host);
    ctl.update_signals(&mut host, blocked());
    assert_eq!(ctl.state(), PlaybackState::Paused);

    ctl.update_signals(&mut host, HostSignals::default());
    assert_eq!(ctl.state(), PlaybackState::Playing);
    assert_eq!(timelines(&rt), 2);
    assert_eq!(rt.count(|c| *c == Call::Kill), 1);
}

#[test]
fn unblocking_after_target_unmounts_falls_back_to_idle() {
    let (mut ctl, mut host, _rt) = setup(entrance(500.0), manual());
    ctl.play(&mut host);
    ctl.tick(0.0);
    ctl.tick(200.0);
    ctl.update_signals(&mut host, blocked());

    ctl.set_queue(entrance(800.0));
    host.resolver = Box::new(FixedResolver {
        missing: vec!["box".into()],
        ..FixedResolver::default()
    });
    let seen = record(&mut ctl);
    ctl.update_signals(&mut host, HostSignals::default());

    assert_eq!(ctl.state(), PlaybackState::Idle);
    assert_eq!(ctl.cache_state(), CacheState::Absent);
    assert!(!ctl.is_frame_scheduled());
    assert_eq!(ctl.tick(300.0), None);
    assert_eq!(seen.borrow().last().map(|t| t.is_playing), Some(false));
}

#[test]
fn play_while_blocked_is_parked() {
    let (mut ctl, mut host, rt) = setup(entrance(500.0), manual());
    ctl.update_signals(&mut host, blocked());
    ctl.play(&mut host);
    assert_eq!(ctl.state(), PlaybackState::Paused);
    assert_eq!(timelines(&rt), 0);

    ctl.update_signals(&mut host, HostSignals::default());
    assert_eq!(ctl.state(), PlaybackState::Playing);
}

#[test]
fn seek_compiles_lazily_without_playing() {
    let (mut ctl, mut host, rt) = setup(entrance(500.0), manual());
    let seen = record(&mut ctl);

    ctl.seek(&mut host, 300.0);
    assert_eq!(ctl.state(), PlaybackState::Idle);
    assert_eq!(ctl.cache_state(), CacheState::Compiled);
    assert!(rt.calls().contains(&Call::Seek(0.3)));
    assert_eq!(
        seen.borrow().last(),
        Some(&PlaybackTick {
            current_time_ms: 300.0,
            is_playing: false
        })
    );

    ctl.seek(&mut host, 9000.0);
    assert_eq!(ctl.current_time_ms(), 500.0);
    ctl.seek(&mut host, -5.0);
    assert_eq!(ctl.current_time_ms(), 0.0);
    assert_eq!(timelines(&rt), 1);
}

#[test]
fn seek_after_completion_pauses_there() {
    let (mut ctl, mut host, _rt) = setup(entrance(500.0), manual());
    ctl.play(&mut host);
    ctl.tick(0.0);
    ctl.tick(600.0);
    assert_eq!(ctl.state(), PlaybackState::Completed);

    ctl.seek(&mut host, 100.0);
    assert_eq!(ctl.state(), PlaybackState::Paused);
    ctl.play(&mut host);
    assert_eq!(ctl.current_time_ms(), 100.0);
}

#[test]
fn queue_change_marks_cache_stale_and_recompiles() {
    let (mut ctl, mut host, rt) = setup(entrance(500.0), manual());
    ctl.play(&mut host);

    ctl.set_queue(entrance(800.0));
    assert_eq!(ctl.cache_state(), CacheState::Stale);
    ctl.set_queue(entrance(500.0));
    assert_eq!(ctl.cache_state(), CacheState::Compiled);

    ctl.set_queue(entrance(800.0));
    ctl.seek(&mut host, 700.0);
    assert_eq!(ctl.cache_state(), CacheState::Compiled);
    assert_eq!(timelines(&rt), 2);
    assert_eq!(rt.count(|c| *c == Call::Kill), 1);
    assert_eq!(ctl.current_time_ms(), 700.0);
}

#[test]
fn user_pause_resumes_without_recompiling() {
    let (mut ctl, mut host, rt) = setup(entrance(500.0), manual());
    ctl.play(&mut host);
    ctl.tick(0.0);
    ctl.tick(100.0);
    ctl.pause();
    assert_eq!(ctl.state(), PlaybackState::Paused);

    ctl.play(&mut host);
    assert_eq!(ctl.state(), PlaybackState::Playing);
    assert_eq!(ctl.current_time_ms(), 100.0);
    assert_eq!(timelines(&rt), 1);
}

#[test]
fn play_again_restarts_cleanly() {
    let (mut ctl, mut host, rt) = setup(entrance(500.0), manual());
    ctl.play(&mut host);
    ctl.tick(0.0);
    ctl.tick(300.0);

    ctl.play(&mut host);
    assert_eq!(ctl.current_time_ms(), 0.0);
    assert_eq!(timelines(&rt), 2);
    let calls = rt.calls();
    let kill = calls.iter().position(|c| *c == Call::Kill).unwrap();
    let second = calls.iter().rposition(|c| *c == Call::CreateTimeline).unwrap();
    assert!(kill < second);
}

#[test]
fn reset_cleans_up_once() {
    let mut q = AnimationQueue::default();
    q.set_phase(
        Phase::Entrance,
        vec![inst("text", json!({ "delay": 30, "opacity": [0, 1] }))],
    );
    let splitter = CountingSplitter::new(3);
    let reverts = splitter.reverts.clone();
    let rt = RecordingRuntime::default();
    let mut host = PlaybackHost::new(rt.clone(), FixedResolver::default()).with_splitter(splitter);
    let mut ctl: Ctl = PlaybackController::new("t".into(), SubjectKind::Element, q, manual());

    ctl.play(&mut host);
    ctl.tick(0.0);
    ctl.tick(200.0);
    rt.clear_log();

    ctl.reset(&mut host);
    assert_eq!(ctl.state(), PlaybackState::Idle);
    assert_eq!(ctl.cache_state(), CacheState::Absent);
    assert_eq!(ctl.current_time_ms(), 0.0);
    assert_eq!(reverts.get(), 1);
    assert_eq!(
        rt.calls(),
        vec![Call::Kill, Call::Clear(vec![1, 2, 100, 101, 102])]
    );

    let seen = record(&mut ctl);
    ctl.reset(&mut host);
    assert_eq!(reverts.get(), 1);
    assert_eq!(rt.calls().len(), 2);
    assert!(seen.borrow().is_empty());
}

#[test]
fn reset_on_idle_subject_is_a_no_op() {
    let (mut ctl, mut host, rt) = setup(entrance(500.0), manual());
    ctl.reset(&mut host);
    assert_eq!(ctl.state(), PlaybackState::Idle);
    assert!(rt.calls().is_empty());
}

#[test]
fn unmounted_subject_never_plays() {
    let rt = RecordingRuntime::default();
    let resolver = FixedResolver {
        missing: vec!["box".into()],
        ..FixedResolver::default()
    };
    let mut host = PlaybackHost::new(rt.clone(), resolver);
    let mut ctl: Ctl =
        PlaybackController::new("box".into(), SubjectKind::Element, entrance(500.0), manual());

    ctl.play(&mut host);
    ctl.seek(&mut host, 100.0);
    assert_eq!(ctl.state(), PlaybackState::Idle);
    assert_eq!(ctl.cache_state(), CacheState::Absent);
    assert!(rt.calls().is_empty());
}

#[test]
fn cancel_frame_loop_stops_ticks() {
    let (mut ctl, mut host, _rt) = setup(entrance(500.0), manual());
    ctl.play(&mut host);
    ctl.tick(0.0);
    ctl.cancel_frame_loop();
    assert_eq!(ctl.tick(100.0), None);
    assert_eq!(ctl.state(), PlaybackState::Playing);
}

#[test]
fn unsubscribed_listeners_stop_receiving() {
    let (mut ctl, mut host, _rt) = setup(entrance(500.0), manual());
    let count = Rc::new(RefCell::new(0));
    let sink = count.clone();
    let id = ctl.subscribe(move |_| *sink.borrow_mut() += 1);

    ctl.play(&mut host);
    let after_play = *count.borrow();
    assert!(after_play > 0);

    assert!(ctl.unsubscribe(id));
    assert!(!ctl.unsubscribe(id));
    ctl.tick(0.0);
    assert_eq!(*count.borrow(), after_play);
}

#[test]
fn playback_opts_from_json() {
    let opts = PlaybackOpts::from_reader(r#"{ "loop_preview": true }"#.as_bytes()).unwrap();
    assert!(opts.autoplay);
    assert!(opts.loop_preview);

    let err = PlaybackOpts::from_reader("{ nope".as_bytes()).unwrap_err();
    assert!(matches!(err, StagecueError::Serde(_)));
    assert!(PlaybackOpts::from_path("/definitely/missing.json").is_err());
}

#[test]
fn state_names() {
    assert_eq!(PlaybackState::Completed.name(), "completed");
    assert!(PlaybackState::Playing.is_playing());
    assert!(!PlaybackState::Armed.is_playing());
}
