// Host-side tests for the intro timeline and its host side effects.

use orbit_field::core::*;
use std::cell::RefCell;
use std::rc::Rc;

const DT: f32 = 1.0 / 60.0;

#[derive(Default)]
struct RecordingHost {
    marked: Vec<IntroPhase>,
    target: Option<Rect>,
    alignments: Vec<Alignment>,
}

impl IntroHost for RecordingHost {
    fn mark_phase(&mut self, phase: IntroPhase) {
        self.marked.push(phase);
    }

    fn overlay_rect(&self) -> Option<Rect> {
        Some(Rect::new(0.0, 0.0, 400.0, 200.0))
    }

    fn target_rect(&self) -> Option<Rect> {
        self.target
    }

    fn apply_alignment(&mut self, alignment: Alignment) {
        self.alignments.push(alignment);
    }
}

/// A host whose overlay element is gone: nothing to mark or measure.
struct DetachedHost;

impl IntroHost for DetachedHost {
    fn mark_phase(&mut self, _phase: IntroPhase) {}

    fn overlay_rect(&self) -> Option<Rect> {
        None
    }

    fn target_rect(&self) -> Option<Rect> {
        Some(Rect::new(0.0, 0.0, 100.0, 100.0))
    }

    fn apply_alignment(&mut self, _alignment: Alignment) {
        panic!("no overlay to align");
    }
}

/// Callbacks that record `(name, elapsed)` into a shared log.
fn recording_callbacks(
    log: &Rc<RefCell<Vec<(&'static str, f32)>>>,
    clock: &Rc<RefCell<f32>>,
) -> IntroCallbacks {
    let (l1, c1) = (log.clone(), clock.clone());
    let (l2, c2) = (log.clone(), clock.clone());
    IntroCallbacks {
        on_handoff: Some(Box::new(move || l1.borrow_mut().push(("handoff", *c1.borrow())))),
        on_complete: Some(Box::new(move || l2.borrow_mut().push(("complete", *c2.borrow())))),
    }
}

fn entered(events: &IntroEvents) -> Vec<IntroPhase> {
    events
        .iter()
        .filter_map(|e| match e {
            IntroEvent::Entered(p) => Some(*p),
            IntroEvent::MeasureAlignment => None,
        })
        .collect()
}

#[test]
fn full_run_fires_each_phase_once_in_order() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let clock = Rc::new(RefCell::new(0.0f32));
    let mut seq = IntroSequence::new(recording_callbacks(&log, &clock));
    let mut host = RecordingHost {
        target: Some(Rect::new(100.0, 50.0, 200.0, 100.0)),
        ..Default::default()
    };

    let mut all = Vec::new();
    let mut frame = 0u32;
    loop {
        let t = frame as f32 * DT;
        if t > 7.0 {
            break;
        }
        *clock.borrow_mut() = t;
        all.extend(entered(&seq.frame(t, &mut host)));
        frame += 1;
    }

    assert_eq!(&all[..], &IntroPhase::SEQUENCE[..]);
    assert_eq!(host.marked, all);
    assert!(seq.is_complete());

    let log = log.borrow();
    assert_eq!(log.len(), 2);
    assert_eq!(log[0].0, "handoff");
    assert!((log[0].1 - 4.4).abs() <= DT + 1e-4, "handoff at {}", log[0].1);
    assert_eq!(log[1].0, "complete");
    assert!((log[1].1 - 6.2).abs() <= DT + 1e-4, "complete at {}", log[1].1);
}

#[test]
fn thresholds_are_strict() {
    let mut tl = IntroTimeline::new();
    assert!(entered(&tl.advance(0.55)).is_empty());
    assert_eq!(entered(&tl.advance(0.5501)), vec![IntroPhase::Forming]);
    assert_eq!(tl.phase(), IntroPhase::Forming);
}

#[test]
fn large_jump_enters_every_crossed_phase_in_order() {
    let mut tl = IntroTimeline::new();
    tl.advance(0.1);
    let phases = entered(&tl.advance(5.0));
    assert_eq!(
        phases,
        vec![
            IntroPhase::Forming,
            IntroPhase::Blinking,
            IntroPhase::Scattering,
            IntroPhase::Locking,
            IntroPhase::HandingOff,
        ]
    );
    assert!(tl.has_entered(IntroPhase::Locking));
    assert!(!tl.has_entered(IntroPhase::Complete));
}

#[test]
fn clock_never_runs_backwards() {
    let mut tl = IntroTimeline::new();
    tl.advance(2.0);
    assert_eq!(tl.phase(), IntroPhase::Scattering);
    assert!(tl.advance(0.5).is_empty());
    assert_eq!(tl.elapsed(), 2.0);
    assert!(tl.advance(f32::NAN).is_empty());
    assert_eq!(tl.phase(), IntroPhase::Scattering);
}

#[test]
fn alignment_is_measured_on_two_frames_after_handoff() {
    let mut seq = IntroSequence::new(IntroCallbacks::default());
    let mut host = RecordingHost {
        target: Some(Rect::new(100.0, 50.0, 200.0, 100.0)),
        ..Default::default()
    };
    seq.frame(4.0, &mut host);
    let at_handoff = seq.frame(4.41, &mut host);
    assert!(!at_handoff.contains(&IntroEvent::MeasureAlignment));
    assert!(host.alignments.is_empty());

    assert!(seq
        .frame(4.42, &mut host)
        .contains(&IntroEvent::MeasureAlignment));
    assert!(seq
        .frame(4.43, &mut host)
        .contains(&IntroEvent::MeasureAlignment));
    assert!(!seq
        .frame(4.44, &mut host)
        .contains(&IntroEvent::MeasureAlignment));
    assert_eq!(host.alignments.len(), 2);

    let a = host.alignments[0];
    // Overlay center (200,100), target center (200,100), scale min(0.5, 0.5).
    assert_eq!(a.translate_x, 0.0);
    assert_eq!(a.translate_y, 0.0);
    assert_eq!(a.scale, 0.5);
}

#[test]
fn resuming_past_complete_still_aligns_on_next_frames() {
    let mut seq = IntroSequence::new(IntroCallbacks::default());
    let mut host = RecordingHost {
        target: Some(Rect::new(100.0, 50.0, 200.0, 100.0)),
        ..Default::default()
    };
    seq.frame(0.1, &mut host);
    let events = seq.frame(7.0, &mut host);
    assert!(entered(&events).contains(&IntroPhase::HandingOff));
    assert!(entered(&events).contains(&IntroPhase::Complete));
    assert!(seq.is_complete());
    assert!(seq.timeline().has_pending_alignment());
    assert!(!seq.is_settled(), "loop must keep running for alignment");
    assert!(host.alignments.is_empty());

    seq.frame(7.02, &mut host);
    assert!(!seq.is_settled());
    seq.frame(7.04, &mut host);
    assert!(seq.is_settled());
    assert_eq!(host.alignments.len(), 2);

    seq.frame(7.06, &mut host);
    assert_eq!(host.alignments.len(), 2);
}

#[test]
fn settled_only_after_alignment_frames_in_normal_run() {
    let mut seq = IntroSequence::new(IntroCallbacks::default());
    let mut host = RecordingHost::default();
    let mut t = 0.0;
    let mut settled_at = None;
    while t < 8.0 {
        seq.frame(t, &mut host);
        if settled_at.is_none() && seq.is_settled() {
            settled_at = Some(t);
        }
        t += DT;
    }
    let settled_at = settled_at.expect("sequence never settled");
    assert!(settled_at > constants::COMPLETE_TIME);
}

#[test]
fn detached_overlay_still_fires_both_callbacks() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let clock = Rc::new(RefCell::new(0.0f32));
    let mut seq = IntroSequence::new(recording_callbacks(&log, &clock));
    seq.finish(&mut DetachedHost);
    let names: Vec<_> = log.borrow().iter().map(|(n, _)| *n).collect();
    assert_eq!(names, vec!["handoff", "complete"]);
    assert!(seq.is_settled());
}

#[test]
fn detached_overlay_skips_alignment_during_run() {
    let mut seq = IntroSequence::new(IntroCallbacks::default());
    for t in [4.5, 4.6, 4.7, 6.3] {
        seq.frame(t, &mut DetachedHost);
    }
    assert!(seq.is_settled());
}

#[test]
fn missing_target_skips_alignment_without_failing() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let clock = Rc::new(RefCell::new(0.0f32));
    let mut seq = IntroSequence::new(recording_callbacks(&log, &clock));
    let mut host = RecordingHost::default();
    for t in [4.5, 4.6, 4.7, 6.3] {
        seq.frame(t, &mut host);
    }
    assert!(host.alignments.is_empty());
    assert!(seq.is_complete());
    assert_eq!(log.borrow().len(), 2);
}

#[test]
fn finish_fires_handoff_then_complete() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let clock = Rc::new(RefCell::new(0.0f32));
    let mut seq = IntroSequence::new(recording_callbacks(&log, &clock));
    let mut host = RecordingHost::default();
    let events = seq.finish(&mut host);
    assert!(!events.contains(&IntroEvent::MeasureAlignment));
    assert_eq!(entered(&events), IntroPhase::SEQUENCE.to_vec());
    let names: Vec<_> = log.borrow().iter().map(|(n, _)| *n).collect();
    assert_eq!(names, vec!["handoff", "complete"]);

    // Nothing fires twice.
    seq.finish(&mut host);
    seq.frame(10.0, &mut host);
    assert_eq!(log.borrow().len(), 2);
}

#[test]
fn cancel_drops_pending_callbacks() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let clock = Rc::new(RefCell::new(0.0f32));
    let mut seq = IntroSequence::new(recording_callbacks(&log, &clock));
    let mut host = RecordingHost::default();
    seq.frame(3.0, &mut host);
    seq.cancel();
    seq.frame(7.0, &mut host);
    assert!(log.borrow().is_empty());
    assert!(seq.is_complete());
}

#[test]
fn alignment_rejects_degenerate_boxes() {
    let overlay = Rect::new(0.0, 0.0, 0.0, 100.0);
    let target = Rect::new(0.0, 0.0, 100.0, 100.0);
    assert!(Alignment::between(&overlay, &target).is_none());
    assert!(Alignment::between(&target, &Rect::new(0.0, 0.0, 0.0, 0.0)).is_none());

    let a = Alignment::between(
        &Rect::new(0.0, 0.0, 100.0, 100.0),
        &Rect::new(50.0, 20.0, 50.0, 80.0),
    )
    .unwrap();
    assert_eq!(a.translate_x, 25.0);
    assert_eq!(a.translate_y, 10.0);
    assert_eq!(a.scale, 0.5);
}

#[test]
fn wink_rises_and_falls_around_blink() {
    let blink = constants::BLINK_TIME;
    assert_eq!(wink(0.0), 0.0);
    assert_eq!(wink(blink - 0.2), 0.0);
    assert!(wink(blink + 0.1) > 0.9);
    assert!(wink(blink + 0.4).abs() < 1e-5);
    assert!(wink(3.0).abs() < 1e-5);
}

#[test]
fn intro_model_is_idle_before_scatter() {
    assert_eq!(intro_model(0.0), glam::Mat4::IDENTITY);
    assert_eq!(intro_model(constants::SCATTER_TIME), glam::Mat4::IDENTITY);
    assert_ne!(intro_model(4.0), glam::Mat4::IDENTITY);
}

#[test]
fn uniforms_carry_wink_tilt() {
    let camera = Camera::looking_at_origin(6.4, 58.0, 0.1, 80.0);
    let u = intro_uniforms(1.5, &camera, glam::Vec3::ONE, 19.0);
    assert!(u.tilt > 0.0 && u.tilt <= constants::WINK_TILT);
    assert!(u.yaw > 0.0 && u.yaw <= constants::WINK_YAW);
    assert_eq!(u.scatter, constants::SCATTER_TIME);
    assert_eq!(u.escape_threshold, constants::ESCAPE_SEED_THRESHOLD);
}
