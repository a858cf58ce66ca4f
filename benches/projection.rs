//! Benchmark suite for relation projection
//!
//! Covers:
//! - Partition: IPC decode, column derivation (serial + parallel)
//! - Relation: constant reinsertion + full row materialization
//! - Union: row translation across many constituents
//!
//! Run: cargo bench --bench projection

use std::sync::Arc;

use arrow::array::{ArrayRef, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::ipc::writer::StreamWriter;
use arrow::record_batch::RecordBatch;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use relview::types::PrimitiveType;
use relview::{DecodeStats, Descriptor, Partition, ProjectionConfig, Relation, Signature, Tabular};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn wide_batch(rows: usize, columns: usize) -> RecordBatch {
    let mut fields = Vec::with_capacity(columns);
    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(columns);
    for c in 0..columns {
        if c % 2 == 0 {
            fields.push(Field::new(format!("i{}", c), DataType::Int64, false));
            arrays.push(Arc::new(Int64Array::from_iter_values((0..rows as i64).map(|r| r * c as i64))));
        } else {
            fields.push(Field::new(format!("s{}", c), DataType::Utf8, false));
            arrays.push(Arc::new(StringArray::from_iter_values((0..rows).map(|r| format!("v{}", r)))));
        }
    }
    RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays).unwrap()
}

fn signature(columns: usize) -> Signature {
    let mut descriptors = vec![Descriptor::symbol("output")];
    for c in 0..columns {
        descriptors.push(if c % 2 == 0 {
            Descriptor::Primitive(PrimitiveType::Int64)
        } else {
            Descriptor::Primitive(PrimitiveType::String)
        });
    }
    Signature::new(descriptors)
}

fn to_ipc(batch: &RecordBatch) -> Vec<u8> {
    let mut buf = Vec::new();
    {
        let mut writer = StreamWriter::try_new(&mut buf, &batch.schema()).unwrap();
        writer.write(batch).unwrap();
        writer.finish().unwrap();
    }
    buf
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_partition_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("partition_decode");
    for columns in [4, 32] {
        let batch = wide_batch(10_000, columns);
        let bytes = to_ipc(&batch);

        group.bench_with_input(BenchmarkId::new("ipc", columns), &bytes, |b, bytes| {
            b.iter(|| black_box(Partition::from_ipc(bytes).unwrap().row_count()))
        });

        for parallel in [false, true] {
            let config = ProjectionConfig {
                parallel_decode: parallel,
                parallel_threshold: 2,
                ..Default::default()
            };
            let name = if parallel { "columns_parallel" } else { "columns_serial" };
            group.bench_with_input(BenchmarkId::new(name, columns), &batch, |b, batch| {
                b.iter(|| {
                    let p = Partition::new(batch.clone()).with_config(&config);
                    black_box(p.columns().len())
                })
            });
        }
    }
    group.finish();
}

fn bench_relation_rows(c: &mut Criterion) {
    let columns = 8;
    let partition = Arc::new(Partition::new(wide_batch(10_000, columns)));
    c.bench_function("relation_rows_10k", |b| {
        b.iter(|| {
            let rel = Relation::from_partition(
                "/:output",
                Arc::clone(&partition),
                signature(columns),
                Arc::new(DecodeStats::new()),
            );
            black_box(rel.rows().count())
        })
    });
}

fn bench_union_lookup(c: &mut Criterion) {
    let relations: Vec<Arc<Relation>> = (0..64)
        .map(|_| {
            Arc::new(Relation::from_partition(
                "/:output",
                Arc::new(Partition::new(wide_batch(100, 2))),
                signature(2),
                Arc::new(DecodeStats::new()),
            ))
        })
        .collect();
    let union = Relation::union(&relations);
    let rows = union.row_count();
    c.bench_function("union_row_lookup", |b| {
        let mut i = 0;
        b.iter(|| {
            i = (i + 97) % rows;
            black_box(union.row(i))
        })
    });
}

criterion_group!(benches, bench_partition_decode, bench_relation_rows, bench_union_lookup);
criterion_main!(benches);
