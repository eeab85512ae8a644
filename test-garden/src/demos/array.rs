//! Each sort sees the same freshly built array, even though both mutate it.

use test_garden::{Garden, GardenError, Summary, check};

pub fn run(garden: Garden) -> Result<Summary, GardenError> {
    garden.run("array", |g| {
        let mut a: Vec<f64> = (0..=10).map(f64::from).collect();

        g.scenario("sort", |g| {
            a.push(3.5);

            g.scenario("numerically", |_| {
                a.sort_by(f64::total_cmp);
                check!(a[0] == 0.0);
                check!(a[4] == 3.5);
            });

            g.scenario("lexicographically", |_| {
                let mut sorted = a.clone();
                sorted.sort_by_key(f64::to_string);
                // a second push of 3.5 would shift this
                check!(sorted[6] == 4.0, "expected 4 at index 6, got {sorted:?}");
            });
        });
    })
}
