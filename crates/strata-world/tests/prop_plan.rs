use proptest::prelude::*;
use strata_blocks::Biome;
use strata_chunk::{ChunkPos, WorldHeight};
use strata_world::generation::biome::{MOUNTAIN_HEIGHT, SEA_LEVEL};
use strata_world::{TerrainGenerator, WorldGenParams};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn plan_stays_in_band_and_matches_classes(seed in any::<i64>(), cx in -100_000i32..100_000, cz in -100_000i32..100_000) {
        let params = WorldGenParams::default();
        let (lo, hi) = (params.min_height, params.max_height);
        let g = TerrainGenerator::new(seed, WorldHeight::default(), params);
        let plan = g.plan(ChunkPos::new(cx, cz));
        prop_assert_eq!(&plan, &g.plan(ChunkPos::new(cx, cz)));
        for z in 0..16 {
            for x in 0..16 {
                let h = plan.height(x, z);
                let biome = plan.biome(x, z);
                prop_assert!((lo..=hi).contains(&h));
                prop_assert_eq!(biome == Biome::Ocean, h < SEA_LEVEL);
                prop_assert_eq!(
                    matches!(biome, Biome::Mountains | Biome::SnowyTundra),
                    h > MOUNTAIN_HEIGHT
                );
            }
        }
    }
}
