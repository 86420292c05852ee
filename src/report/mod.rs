pub mod chart;
pub mod generator;
pub mod table;

pub use chart::{build_chart, StreakChart, StreakDataset};
pub use generator::{generate_report, write_report};
pub use table::{
    build_table, AverageRow, HabitRow, HabitTable, LastCompleted, SortDirection, SortField,
    TableQuery,
};
