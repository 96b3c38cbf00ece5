//! Store lightweight ids instead of whole entities, then query without
//! duplicate candidates. This is the usual shape for simulations whose
//! entities are too big (or not `Copy`) to store in the grid directly.
use gridhash::prelude::*;

struct Crate {
    id: u32,
    min_x: f64,
    min_y: f64,
    size: f64,
}

impl Aabb for Crate {
    fn x(&self) -> f64 {
        self.min_x
    }

    fn y(&self) -> f64 {
        self.min_y
    }

    fn w(&self) -> f64 {
        self.size
    }

    fn h(&self) -> f64 {
        self.size
    }
}

fn main() {
    let crates = vec![
        Crate { id: 0, min_x: 9.0, min_y: 9.0, size: 2.0 }, // straddles 4 cells
        Crate { id: 1, min_x: 0.0, min_y: 0.0, size: 1.0 },
        Crate { id: 2, min_x: 25.0, min_y: 25.0, size: 1.0 },
    ];

    let mut grid = GridHash::new(10.0, 16).unwrap();
    grid.populate_with(&crates, |c| c.id).unwrap();

    // Crate 0 spans four cells, so a wide probe would see it four times with
    // plain query; query_unique collapses the repeats.
    let probe = Rect::new(5.0, 5.0, 10.0, 10.0);
    let mut raw = Vec::new();
    grid.query(&probe, |&id| raw.push(id));
    let mut unique = Vec::new();
    grid.query_unique(&probe, |&id| unique.push(id));

    println!("query:        {raw:?}");
    println!("query_unique: {unique:?}");

    assert_eq!(raw.iter().filter(|&&id| id == 0).count(), 4, "One hit per shared cell");
    assert_eq!(unique.iter().filter(|&&id| id == 0).count(), 1, "Deduped to one hit");
    assert!(!unique.contains(&2), "Distant crate is not a candidate");

    println!("All assertions passed!");
}
