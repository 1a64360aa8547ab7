use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use lined_core::{Editor, TextEditor};

fn large_text(line_count: usize) -> String {
    let mut out = String::with_capacity(line_count * 64);
    for i in 0..line_count {
        out.push_str(&format!(
            "{i:06} the quick brown fox jumps over the lazy dog (lined benchmark line)\n"
        ));
    }
    // Remove the final '\n' to avoid creating an extra trailing empty line.
    out.pop();
    out
}

fn bench_large_file_open(c: &mut Criterion) {
    let text = large_text(50_000);
    c.bench_function("large_file_open/50k_lines", |b| {
        b.iter(|| {
            let editor = TextEditor::new("bench.txt", black_box(&text));
            black_box(editor.line_count());
        })
    });
}

fn bench_typing_in_middle(c: &mut Criterion) {
    let text = large_text(50_000);
    c.bench_function("typing_middle/100_inserts", |b| {
        b.iter_batched(
            || TextEditor::new("bench.txt", &text),
            |mut editor| {
                let line = editor.line_count() / 2;
                for col in 1..=100 {
                    editor.insert(line, col, "x");
                }
                black_box(editor.undo_depth());
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_append_small_buffer(c: &mut Criterion) {
    c.bench_function("append/100_lines_small_buffer", |b| {
        b.iter_batched(
            || TextEditor::new("bench.txt", "header"),
            |mut editor| {
                for i in 0..100 {
                    editor.append(&format!("line {i}"));
                }
                black_box(editor.line_count());
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_undo_redo_cycle(c: &mut Criterion) {
    let text = large_text(50_000);
    c.bench_function("undo_redo/100_deletes", |b| {
        b.iter_batched(
            || {
                let mut editor = TextEditor::new("bench.txt", &text);
                for line in 1..=100 {
                    editor.delete(line * 10, 1, 6);
                }
                editor
            },
            |mut editor| {
                while editor.undo() {}
                while editor.redo() {}
                black_box(editor.redo_depth());
            },
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(
    benches,
    bench_large_file_open,
    bench_typing_in_middle,
    bench_append_small_buffer,
    bench_undo_redo_cycle
);
criterion_main!(benches);
