//! Density and conservation properties over random operation sequences.

use std::sync::Arc;

use kanban::board::{
    adapters::memory::InMemoryBoardStore,
    domain::{Board, ColumnId, TaskId},
    ports::BoardStore,
    services::{CreateTaskRequest, MoveTaskRequest, OrderingEngine, OrderingError},
};
use proptest::prelude::*;
use proptest::sample::Index;
use tokio::runtime::Runtime;

#[derive(Debug, Clone)]
enum Op {
    Create {
        column: i64,
    },
    Move {
        task: Index,
        column: i64,
        hint: Option<f64>,
    },
    Advance {
        task: Index,
    },
}

fn arb_hint() -> impl Strategy<Value = Option<f64>> {
    prop::option::of(prop_oneof![
        4 => -3.0_f64..12.0,
        1 => Just(f64::NAN),
        1 => Just(f64::INFINITY),
    ])
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        2 => (1_i64..=3).prop_map(|column| Op::Create { column }),
        4 => (any::<Index>(), 1_i64..=3, arb_hint())
            .prop_map(|(task, column, hint)| Op::Move { task, column, hint }),
        1 => any::<Index>().prop_map(|task| Op::Advance { task }),
    ]
}

fn setup() -> (Runtime, OrderingEngine<InMemoryBoardStore>) {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("tokio runtime");
    let store = Arc::new(InMemoryBoardStore::new());
    rt.block_on(store.initialize()).expect("seed columns");
    (rt, OrderingEngine::new(store))
}

fn column(id: i64) -> ColumnId {
    ColumnId::new(id).expect("valid column id")
}

/// Task ids of a column in display order, leaving out `skip`.
fn ids_in(board: &Board, col: ColumnId, skip: TaskId) -> Vec<TaskId> {
    board
        .column_tasks(col)
        .iter()
        .map(|task| task.id())
        .filter(|id| *id != skip)
        .collect()
}

fn ordinal_after(count: usize) -> i32 {
    i32::try_from(count + 1).expect("small board")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn operations_keep_columns_dense_and_tasks_conserved(
        ops in prop::collection::vec(arb_op(), 1..40),
    ) {
        let (rt, engine) = setup();
        let mut created: Vec<TaskId> = Vec::new();

        for op in ops {
            let before = rt.block_on(engine.list_board()).expect("listing");
            match op {
                Op::Create { column: col_id } => {
                    let count = before.column_tasks(column(col_id)).len();
                    let task = rt
                        .block_on(engine.create_task(CreateTaskRequest::new(col_id, "card")))
                        .expect("create");
                    prop_assert_eq!(task.ord().value(), ordinal_after(count));
                    created.push(task.id());
                }
                Op::Move { task, column: col_id, hint } => {
                    if created.is_empty() {
                        continue;
                    }
                    let id = *task.get(&created);
                    let destination = column(col_id);
                    let source = before
                        .tasks()
                        .iter()
                        .find(|candidate| candidate.id() == id)
                        .map(|candidate| candidate.col_id())
                        .expect("task exists");
                    let count_to = before.column_tasks(destination).len();
                    let source_others = ids_in(&before, source, id);
                    let destination_others = ids_in(&before, destination, id);

                    let append = MoveTaskRequest::new(id.value(), col_id);
                    let request = match hint {
                        Some(value) => append.with_target(value),
                        None => append,
                    };
                    let moved = rt.block_on(engine.move_task(request)).expect("move");
                    let after = rt.block_on(engine.list_board()).expect("listing");

                    prop_assert_eq!(after.tasks().len(), before.tasks().len());
                    prop_assert_eq!(moved.col_id(), destination);
                    prop_assert_eq!(ids_in(&after, source, id), source_others);
                    prop_assert_eq!(ids_in(&after, destination, id), destination_others);
                    if source == destination {
                        prop_assert_eq!(
                            after.column_tasks(source).len(),
                            before.column_tasks(source).len()
                        );
                    } else {
                        match hint.filter(|value| value.is_finite()) {
                            Some(value) if value <= 0.0 => {
                                prop_assert_eq!(moved.ord().value(), 1);
                            }
                            Some(value) if value.floor() >= f64::from(ordinal_after(count_to)) => {
                                prop_assert_eq!(moved.ord().value(), ordinal_after(count_to));
                            }
                            Some(_) => {}
                            None => {
                                prop_assert_eq!(moved.ord().value(), ordinal_after(count_to));
                            }
                        }
                    }
                }
                Op::Advance { task } => {
                    if created.is_empty() {
                        continue;
                    }
                    let id = *task.get(&created);
                    let result = rt.block_on(engine.advance_task(id.value()));
                    prop_assert!(matches!(
                        result,
                        Ok(_) | Err(OrderingError::AlreadyInLastColumn { .. })
                    ), "unexpected advance result: {:?}", result);
                }
            }

            let after = rt.block_on(engine.list_board()).expect("listing");
            prop_assert!(after.check_density().is_empty());
            prop_assert_eq!(after.tasks().len(), created.len());
        }
    }
}
