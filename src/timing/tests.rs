use super::*;
use crate::error::GridError;

fn grid(bpm: f64, beats_per_bar: u32, offset_seconds: f64, duration_seconds: f64) -> BeatGrid {
    BeatGrid {
        bpm,
        beats_per_bar,
        offset_seconds,
        duration_seconds,
    }
}

const UNIT: TimeScale = TimeScale {
    px_per_second: 100.0,
    x_scale: 1.0,
};

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

#[test]
fn test_seconds_per_beat() {
    assert_eq!(seconds_per_beat(120.0).unwrap(), 0.5);
    assert_eq!(seconds_per_beat(60.0).unwrap(), 1.0);
    assert_eq!(seconds_per_bar(120.0, 4).unwrap(), 2.0);
    assert!(close(seconds_per_bar(90.0, 3).unwrap(), 2.0));
}

#[test]
fn test_non_positive_tempo_rejected() {
    assert!(matches!(seconds_per_beat(0.0), Err(GridError::InvalidInput(_))));
    assert!(matches!(seconds_per_beat(-120.0), Err(GridError::InvalidInput(_))));
    assert!(matches!(beat_count(0.0, 10.0), Err(GridError::InvalidInput(_))));
    assert!(matches!(
        generate_beat_markers(&grid(-1.0, 4, 0.0, 10.0), &UNIT),
        Err(GridError::InvalidInput(_))
    ));
}

#[test]
fn test_zero_beats_per_bar_rejected() {
    assert!(matches!(seconds_per_bar(120.0, 0), Err(GridError::InvalidInput(_))));
    assert!(matches!(
        generate_bar_markers(&grid(120.0, 0, 0.0, 10.0), &UNIT),
        Err(GridError::InvalidInput(_))
    ));
}

#[test]
fn test_beat_count_rounds_up() {
    assert_eq!(beat_count(120.0, 10.0).unwrap(), 20);
    assert_eq!(beat_count(120.0, 10.1).unwrap(), 21);
    assert_eq!(beat_count(100.0, 1.0).unwrap(), 2);
    assert_eq!(beat_count(120.0, 0.0).unwrap(), 0);
    assert!(matches!(beat_count(120.0, -1.0), Err(GridError::InvalidInput(_))));
}

#[test]
fn test_oversized_grid_rejected() {
    // 1e300 s would otherwise saturate the count and overflow the allocation
    assert!(matches!(beat_count(120.0, 1e300), Err(GridError::InvalidInput(_))));
    assert!(matches!(
        generate_beat_markers(&grid(120.0, 4, 0.0, 1e300), &UNIT),
        Err(GridError::InvalidInput(_))
    ));
    assert!(matches!(
        generate_bar_markers(&grid(120.0, 4, 0.0, 1e10), &UNIT),
        Err(GridError::InvalidInput(_))
    ));

    // exactly at the limit is still allowed
    let seconds = MAX_BEATS as f64 / 2.0;
    assert_eq!(beat_count(120.0, seconds).unwrap(), MAX_BEATS);
    assert!(beat_count(120.0, seconds + 1.0).is_err());
}

#[test]
fn test_beat_markers_basic() {
    let markers = generate_beat_markers(&grid(120.0, 4, 0.0, 10.0), &UNIT).unwrap();
    assert_eq!(markers.len(), 21);
    for (i, marker) in markers.iter().enumerate() {
        assert_eq!(marker.beat_index, i as u64);
        assert_eq!(marker.pixel_x, 50.0 * i as f64);
        assert_eq!(marker.is_bar_start, i % 4 == 0);
    }
    assert_eq!(markers.last().unwrap().pixel_x, 1000.0);
}

#[test]
fn test_beat_markers_include_trailing_partial_beat() {
    // 10.1 s at 120 BPM is 20.2 beats: beats 0..=21
    let markers = generate_beat_markers(&grid(120.0, 4, 0.0, 10.1), &UNIT).unwrap();
    assert_eq!(markers.len(), 22);
    assert_eq!(markers.last().unwrap().pixel_x, 1050.0);
}

#[test]
fn test_empty_duration_still_has_downbeat() {
    let beats = generate_beat_markers(&grid(120.0, 4, 0.0, 0.0), &UNIT).unwrap();
    assert_eq!(beats.len(), 1);
    assert!(beats[0].is_bar_start);

    let bars = generate_bar_markers(&grid(120.0, 4, 0.0, 0.0), &UNIT).unwrap();
    assert_eq!(bars.len(), 1);
    assert_eq!(bars[0].bar_number, 1);
}

#[test]
fn test_offset_shifts_grid() {
    let markers = generate_beat_markers(&grid(120.0, 4, 0.25, 2.0), &UNIT).unwrap();
    assert_eq!(markers[0].pixel_x, 25.0);
    assert_eq!(markers[1].pixel_x, 75.0);

    let markers = generate_beat_markers(&grid(120.0, 4, -0.25, 2.0), &UNIT).unwrap();
    assert_eq!(markers[0].pixel_x, -25.0);
    assert_eq!(markers[1].pixel_x, 25.0);
}

#[test]
fn test_x_scale_applies_to_everything() {
    let scale = TimeScale {
        px_per_second: 50.0,
        x_scale: 2.0,
    };
    let beats = generate_beat_markers(&grid(120.0, 4, 0.5, 4.0), &scale).unwrap();
    // (0.5 * 50 + i * 0.5 * 50) * 2
    assert_eq!(beats[0].pixel_x, 50.0);
    assert_eq!(beats[1].pixel_x, 100.0);

    let bars = generate_bar_markers(&grid(120.0, 4, 0.5, 4.0), &scale).unwrap();
    assert_eq!(bars[0].pixel_x, 50.0);
    assert_eq!(bars[1].pixel_x, 250.0);
}

#[test]
fn test_bar_markers_basic() {
    let bars = generate_bar_markers(&grid(120.0, 4, 0.0, 10.0), &UNIT).unwrap();
    // 20 beats / 4 + 1
    assert_eq!(bars.len(), 6);
    for (i, bar) in bars.iter().enumerate() {
        assert_eq!(bar.bar_number, i as u64 + 1);
        assert_eq!(bar.pixel_x, 200.0 * i as f64);
    }
    assert_eq!(bars[2].label(), "3");
}

#[test]
fn test_bar_count_uses_floor() {
    // 21 beats in 3/4: floor(21 / 3) + 1 = 8 bars
    let bars = generate_bar_markers(&grid(120.0, 3, 0.0, 10.1), &UNIT).unwrap();
    assert_eq!(bars.len(), 8);
    // 22 beats in 4/4: floor(22 / 4) + 1 = 6 bars
    let bars = generate_bar_markers(&grid(120.0, 4, 0.0, 10.6), &UNIT).unwrap();
    assert_eq!(bars.len(), 6);
}

#[test]
fn test_bars_land_on_bar_start_beats() {
    let cases = [
        grid(120.0, 4, 0.0, 10.0),
        grid(97.0, 3, 0.37, 61.3),
        grid(173.0, 7, -1.9, 240.0),
        grid(41.0, 5, 12.25, 33.3),
        grid(300.0, 1, 0.001, 5.5),
    ];
    let scales = [
        UNIT,
        TimeScale {
            px_per_second: 50.0,
            x_scale: 2.0,
        },
        TimeScale {
            px_per_second: 43.07,
            x_scale: 1.5,
        },
    ];

    for g in &cases {
        for scale in &scales {
            let beats = generate_beat_markers(g, scale).unwrap();
            let bars = generate_bar_markers(g, scale).unwrap();
            for bar in &bars {
                let beat_index = ((bar.bar_number - 1) * g.beats_per_bar as u64) as usize;
                let beat = &beats[beat_index];
                assert!(beat.is_bar_start);
                assert!(
                    close(bar.pixel_x, beat.pixel_x),
                    "bar {} at {} but beat {} at {}",
                    bar.bar_number,
                    bar.pixel_x,
                    beat_index,
                    beat.pixel_x
                );
            }
        }
    }
}

#[test]
fn test_markers_are_monotonic() {
    let beats = generate_beat_markers(&grid(133.0, 4, -0.7, 95.0), &UNIT).unwrap();
    assert!(beats.windows(2).all(|w| w[0].pixel_x < w[1].pixel_x));
    let bars = generate_bar_markers(&grid(133.0, 4, -0.7, 95.0), &UNIT).unwrap();
    assert!(bars.windows(2).all(|w| w[0].pixel_x < w[1].pixel_x));
}

#[test]
fn test_playhead_mapping() {
    let scale = TimeScale {
        px_per_second: 50.0,
        x_scale: 2.0,
    };
    assert_eq!(time_to_pixel_x(3.0, &scale).unwrap(), 300.0);
    assert_eq!(pixel_x_to_time(300.0, &scale).unwrap(), 3.0);
    assert_eq!(pixel_x_to_time(0.0, &scale).unwrap(), 0.0);

    let broken = TimeScale {
        px_per_second: 0.0,
        x_scale: 2.0,
    };
    assert!(matches!(pixel_x_to_time(10.0, &broken), Err(GridError::InvalidInput(_))));
}

#[test]
fn test_duration_from_samples() {
    assert_eq!(duration_from_samples(441_000, 44_100.0).unwrap(), 10.0);
    assert_eq!(duration_from_samples(0, 48_000.0).unwrap(), 0.0);
    assert!(matches!(
        duration_from_samples(100, 0.0),
        Err(GridError::InvalidInput(_))
    ));
}
