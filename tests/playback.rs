use pretty_assertions::assert_eq;
use smfkit::prelude::*;

// Two tracks, 240 ticks per quarter note, 120 BPM, ending at tick 960.
fn two_seconds() -> MidiFile {
    let mut bytes = b"MThd\0\0\0\x06\0\x01\0\x02\0\xF0".to_vec();
    let conductor: &[u8] = &[
        0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20,
        0x87, 0x40, 0xFF, 0x2F, 0x00,
    ];
    let melody: &[u8] = &[
        0x00, 0x90, 0x3C, 0x64,
        0x81, 0x70, 0x3E, 0x64, // running status at 240
        0x81, 0x70, 0x3C, 0x00,
        0x00, 0x3E, 0x00,
        0x00, 0xFF, 0x2F, 0x00,
    ];
    for body in [conductor, melody] {
        bytes.extend_from_slice(b"MTrk");
        bytes.extend_from_slice(&(body.len() as u32).to_be_bytes());
        bytes.extend_from_slice(body);
    }
    MidiFile::parse(&bytes).unwrap()
}

fn events(notifications: &[Notification]) -> Vec<(usize, u64)> {
    notifications
        .iter()
        .filter_map(|n| match n {
            Notification::Event { track, event } => Some((*track, event.tick())),
            _ => None,
        })
        .collect()
}

#[test]
fn runtime_of_the_whole_file() {
    let file = two_seconds();
    let timeline = file.timeline().unwrap();
    assert_eq!(timeline.tick_max(), 960);
    assert_eq!(timeline.runtime_seconds(), 2.0);
}

#[test]
fn stop_mid_playback_reports_zero() {
    let file = two_seconds();
    let time = ManualTime::new();
    let mut clock = PlaybackClock::new(&file, time.clone(), ClockSettings::default()).unwrap();
    let rx = clock.subscribe();

    clock.play();
    for _ in 0..600 {
        time.advance(UMicros::from_ms(1));
        clock.run_quantum();
    }
    clock.stop();

    let got: Vec<_> = rx.try_iter().collect();
    assert_eq!(events(&got), vec![(0, 0), (1, 0), (1, 240)]);
    assert_eq!(
        &got[got.len() - 2..],
        &[
            Notification::Stopped,
            Notification::Position {
                elapsed: 0.0,
                total: 2.0
            }
        ]
    );
}

#[test]
fn positions_are_rate_limited() {
    let file = two_seconds();
    let time = ManualTime::new();
    let settings = ClockSettings {
        position_interval: UMicros::from_ms(500),
        ..Default::default()
    };
    let mut clock = PlaybackClock::new(&file, time.clone(), settings).unwrap();
    let rx = clock.subscribe();

    clock.play();
    for _ in 0..1_600 {
        time.advance(UMicros::from_ms(1));
        clock.run_quantum();
    }

    let positions: Vec<_> = rx
        .try_iter()
        .filter_map(|n| match n {
            Notification::Position { elapsed, .. } => Some(elapsed),
            _ => None,
        })
        .collect();
    // at 1 ms, 501 ms, 1001 ms and 1501 ms
    assert_eq!(positions.len(), 4);
    for (position, expected) in positions.iter().zip([0.001, 0.501, 1.001, 1.501]) {
        assert!((position - expected).abs() < 1e-6, "{position} != {expected}");
    }
}

#[test]
fn run_follows_the_file_to_its_end() {
    let file = two_seconds();
    let settings = ClockSettings {
        quantum: UMicros::from_ms(5),
        ..Default::default()
    };
    let mut clock = PlaybackClock::new(&file, ManualTime::new(), settings).unwrap();
    let rx = clock.subscribe();

    clock.play();
    clock.run();

    let got: Vec<_> = rx.try_iter().collect();
    // the melody's end of track plays too, the conductor's coincides with the stop
    assert_eq!(
        events(&got),
        vec![(0, 0), (1, 0), (1, 240), (1, 480), (1, 480), (1, 480)]
    );
    assert_eq!(got.iter().filter(|n| **n == Notification::Stopped).count(), 1);
    assert_eq!(clock.state(), PlaybackState::Stopped);
}

#[test]
fn edits_need_a_fresh_timeline() {
    let mut file = two_seconds();
    file.track_mut(1).unwrap().set_tag(TagKind::Title, "Melody");
    assert!(matches!(
        PlaybackClock::new(&file, ManualTime::new(), ClockSettings::default()),
        Err(PlaybackError::StaleTimeline)
    ));

    file.refresh_timeline();
    let clock = PlaybackClock::new(&file, ManualTime::new(), ClockSettings::default()).unwrap();
    assert_eq!(clock.runtime_seconds(), 2.0);
}

#[test]
fn dropped_subscribers_are_pruned() {
    let file = two_seconds();
    let time = ManualTime::new();
    let mut clock = PlaybackClock::new(&file, time.clone(), ClockSettings::default()).unwrap();
    let kept = clock.subscribe();
    drop(clock.subscribe());

    clock.play();
    time.advance(UMicros::from_ms(1));
    clock.run_quantum();
    assert_eq!(kept.try_iter().count(), 3);
}
