use criterion::{black_box, criterion_group, criterion_main, Criterion};
use minesweeper_ai::{Cell, KnowledgeBase, Minesweeper};

fn reveal_all(board: &Minesweeper) -> KnowledgeBase {
    let mut kb = KnowledgeBase::new(board.height(), board.width());
    for row in 0..board.height() {
        for col in 0..board.width() {
            let cell = Cell::new(row, col);
            if !board.is_mine(cell) && !kb.moves_made().contains(&cell) {
                kb.add_knowledge(cell, board.nearby_mines(cell)).unwrap();
            }
        }
    }
    kb
}

fn add_knowledge_sparse(c: &mut Criterion) {
    let board = Minesweeper::from_str(
        "
        _ _ _ _ _ _ _ _
        _ * _ _ _ _ * _
        _ _ _ _ _ _ _ _
        _ _ _ * _ _ _ _
        _ _ _ _ _ * _ _
        _ _ * _ _ _ _ _
        _ _ _ _ _ _ _ *
        * _ _ _ * _ _ _
    ",
    )
    .unwrap();
    c.bench_function("add_knowledge sparse", |b| {
        b.iter(|| reveal_all(black_box(&board)))
    });
}

fn add_knowledge_dense(c: &mut Criterion) {
    let board = Minesweeper::from_str(
        "
        _ * _ _ * _ _ *
        * _ _ * _ _ * _
        _ _ * _ _ * _ _
        _ * _ _ * _ _ *
        * _ _ * _ _ * _
        _ _ * _ _ * _ _
        _ * _ _ * _ _ *
        * _ _ * _ _ * _
    ",
    )
    .unwrap();
    c.bench_function("add_knowledge dense", |b| {
        b.iter(|| reveal_all(black_box(&board)))
    });
}

criterion_group!(benches, add_knowledge_sparse, add_knowledge_dense);
criterion_main!(benches);
