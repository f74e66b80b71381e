use criterion::{black_box, criterion_group, criterion_main, Criterion};

use termin8::{chip8::ChipSet, resources::Rom};

/// a small arithmetic loop that never leaves its three opcodes
const LOOP_ROM: [u8; 6] = [0x60, 0x00, 0x70, 0x01, 0x12, 0x02];

/// will setup the default configured chip
fn get_default_chip() -> ChipSet {
    let rom = Rom::new("LOOP", LOOP_ROM.to_vec().into_boxed_slice())
        .expect("the bench rom has to fit into ram");
    ChipSet::new(rom)
}

pub fn cycle_bench(c: &mut Criterion) {
    let mut chip = get_default_chip();
    c.bench_function("cycle_bench", |b| {
        b.iter(|| {
            for _ in 0..1000 {
                black_box(chip.step()).expect("the loop rom has no fatal states");
            }
        });
    });
}

criterion_group!(benches, cycle_bench);
criterion_main!(benches);
