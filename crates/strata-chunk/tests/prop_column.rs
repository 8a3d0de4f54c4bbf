use proptest::prelude::*;
use strata_chunk::{Column, WorldHeight};

fn height() -> WorldHeight {
    WorldHeight::new(-32, 95)
}

fn brute_force_top(c: &Column, x: i32, z: i32) -> i32 {
    let h = c.world_height();
    (h.min_y..=h.max_y)
        .rev()
        .find(|&y| c.get_block(x, y, z) != 0)
        .unwrap_or(h.min_y)
}

// Small coordinate range so clears frequently hit the current top block.
fn edit() -> impl Strategy<Value = (i32, i32, i32, u8)> {
    (0i32..3, -32i32..96, 0i32..3, prop_oneof![Just(0u8), 1u8..=20])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // After every set_block, the stored height equals a brute-force scan.
    #[test]
    fn height_map_matches_scan(edits in prop::collection::vec(edit(), 1..120)) {
        let mut c = Column::new(0, 0, height());
        for (x, y, z, id) in edits {
            prop_assert!(c.set_block(x, y, z, id));
            prop_assert_eq!(c.height_at(x, z), brute_force_top(&c, x, z));
        }
    }

    // Records restore blocks, biomes, and heights exactly.
    #[test]
    fn record_restores_column(edits in prop::collection::vec(edit(), 1..60), cx in -1000i32..1000, cz in -1000i32..1000) {
        let mut c = Column::new(cx, cz, height());
        for (x, y, z, id) in &edits {
            c.set_block(*x, *y, *z, *id);
        }
        c.set_biome(1, 1, strata_blocks::Biome::Jungle);
        let back = Column::from_record(c.to_record(), height()).unwrap();
        prop_assert_eq!(back.pos(), c.pos());
        prop_assert_eq!(back.biomes(), c.biomes());
        prop_assert_eq!(back.height_map(), c.height_map());
        for (x, y, z, _) in edits {
            prop_assert_eq!(back.get_block(x, y, z), c.get_block(x, y, z));
        }
    }
}
