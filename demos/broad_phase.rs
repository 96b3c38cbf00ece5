//! Find boxes that actually overlap a probe: candidates from the grid,
//! exact answers from the caller-side overlap test.
use gridhash::prelude::*;

fn main() {
    let boxes = vec![
        Rect::new(0.0, 0.0, 1.0, 1.0), // Box 0
        Rect::new(2.0, 2.0, 1.0, 1.0), // Box 1 (outside probe)
        Rect::new(0.5, 0.5, 1.0, 1.0), // Box 2
    ];

    let mut grid = GridHash::new(4.0, 16).unwrap();
    grid.populate(&boxes).unwrap();

    let probe = Rect::new(0.7, 0.7, 0.6, 0.6);
    let mut hits = Vec::new();
    grid.query(&probe, |candidate| {
        // The grid over-approximates; keep only real overlaps.
        if overlaps(&probe, candidate) {
            hits.push(*candidate);
        }
    });
    println!("Overlapping: {hits:?}");

    // The probe overlaps boxes 0 and 2, but not box 1
    assert_eq!(hits.len(), 2, "Expected 2 overlapping boxes");
    assert!(hits.contains(&boxes[0]), "Box 0 should overlap");
    assert!(hits.contains(&boxes[2]), "Box 2 should overlap");
    assert!(!hits.contains(&boxes[1]), "Box 1 should not overlap");
}
