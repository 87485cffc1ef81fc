//! The optimizer and execution feature record.

use qe_config_binding::DataSize;
use qe_config_binding::DataUnit;
use qe_config_binding::Duration;
use qe_config_binding::TimeUnit;
use qe_config_binding::enum_property;
use strum_macros::EnumIter;
use strum_macros::EnumString;
use strum_macros::IntoStaticStr;
use strum_macros::VariantNames;

/// How joins distribute their build side.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, IntoStaticStr, VariantNames, EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum JoinDistributionType {
    Broadcast,
    Partitioned,
    /// Chosen by the cost-based optimizer
    Automatic,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, IntoStaticStr, VariantNames, EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum JoinReorderingStrategy {
    None,
    EliminateCrossJoins,
    Automatic,
}

/// Regular expression engine backing `regexp_*` functions.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, IntoStaticStr, VariantNames, EnumIter,
)]
pub enum RegexLibrary {
    #[strum(serialize = "JONI")]
    Joni,
    #[strum(serialize = "RE2J")]
    Re2j,
}

/// What an exchange client does when a page fails its checksum.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, IntoStaticStr, VariantNames, EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum DataIntegrityVerification {
    None,
    Abort,
    Retry,
}

enum_property!(
    JoinDistributionType,
    JoinReorderingStrategy,
    RegexLibrary,
    DataIntegrityVerification,
);

/// Feature flags and tuning knobs of the query optimizer and executor.
///
/// Built once at startup, by [`FeaturesConfig::load`] or
/// [`FeaturesConfig::from_properties`], and read-only afterwards. The
/// [`Default`] impl is the documented default of every property.
#[derive(Debug, Clone, PartialEq)]
pub struct FeaturesConfig {
    // Cost model
    pub cpu_cost_weight: f64,
    pub memory_cost_weight: f64,
    pub network_cost_weight: f64,

    // Joins
    pub distributed_index_joins_enabled: bool,
    pub join_max_broadcast_table_size: DataSize,
    pub join_distribution_type: JoinDistributionType,
    pub grouped_execution_enabled: bool,
    pub dynamic_schedule_for_grouped_execution: bool,
    pub concurrent_lifespans_per_task: i32,
    pub colocated_joins_enabled: bool,
    pub spatial_joins_enabled: bool,
    pub join_reordering_strategy: JoinReorderingStrategy,
    pub max_reordered_joins: i32,

    // Writers
    pub redistribute_writes: bool,
    pub use_preferred_write_partitioning: bool,
    pub preferred_write_partitioning_min_number_of_partitions: i32,
    pub scale_writers: bool,
    pub writer_min_size: DataSize,

    pub optimize_metadata_queries: bool,
    pub optimize_hash_generation: bool,
    pub push_table_write_through_union: bool,
    pub dictionary_aggregation: bool,

    pub regex_library: RegexLibrary,
    pub re2j_dfa_states_limit: i32,
    pub re2j_dfa_retries: i32,

    // Spilling
    pub spill_enabled: bool,
    pub spill_order_by: bool,
    pub spill_window_operator: bool,
    pub aggregation_operator_unspill_memory_limit: DataSize,
    pub spiller_spill_paths: Vec<String>,
    pub spiller_threads: i32,
    pub spill_max_used_space_threshold: f64,
    pub memory_revoking_threshold: f64,
    pub memory_revoking_target: f64,

    pub optimize_mixed_distinct_aggregations: bool,
    pub iterative_optimizer_timeout: Duration,
    pub enable_stats_calculator: bool,
    pub statistics_precalculation_for_pushdown_enabled: bool,
    pub collect_plan_statistics_for_all_queries: bool,
    pub ignore_stats_calculator_failures: bool,
    pub default_filter_factor_enabled: bool,
    pub enable_forced_exchange_below_group_id: bool,

    // Exchange
    pub exchange_compression_enabled: bool,
    pub exchange_data_integrity_verification: DataIntegrityVerification,

    pub legacy_row_to_json_cast: bool,
    pub enable_intermediate_aggregations: bool,
    pub push_aggregation_through_outer_join: bool,
    pub push_partial_aggregation_through_join: bool,
    pub parse_decimal_literals_as_double: bool,
    pub force_single_node_output: bool,
    pub pages_index_eager_compaction_enabled: bool,
    pub filter_and_project_min_output_page_size: DataSize,
    pub filter_and_project_min_output_page_row_count: i32,
    pub use_mark_distinct: bool,
    pub prefer_partial_aggregation: bool,
    pub optimize_top_n_ranking: bool,
    pub distributed_sort_enabled: bool,
    pub max_recursion_depth: i32,
    pub max_grouping_sets: i32,
    pub late_materialization_enabled: bool,
    pub skip_redundant_sort: bool,
    pub predicate_pushdown_use_table_properties: bool,
    pub ignore_downstream_preferences: bool,
    pub omit_datetime_type_precision: bool,
    pub iterative_rule_based_column_pruning: bool,
    pub rewrite_filtering_semi_join_to_inner_join: bool,
    pub optimize_duplicate_insensitive_joins: bool,
    pub use_legacy_window_filter_pushdown: bool,
    pub use_table_scan_node_partitioning: bool,
    pub table_scan_node_partitioning_min_bucket_to_task_ratio: f64,
    pub merge_project_with_values: bool,
    pub legacy_catalog_roles: bool,
    pub disable_set_properties_security_check_for_create_ddl: bool,
    pub incremental_hash_array_load_factor_enabled: bool,
}

impl Default for FeaturesConfig {
    fn default() -> Self {
        Self {
            cpu_cost_weight: 75.0,
            memory_cost_weight: 10.0,
            network_cost_weight: 15.0,

            distributed_index_joins_enabled: false,
            join_max_broadcast_table_size: DataSize::of(100, DataUnit::Megabyte),
            join_distribution_type: JoinDistributionType::Automatic,
            grouped_execution_enabled: false,
            dynamic_schedule_for_grouped_execution: false,
            concurrent_lifespans_per_task: 0,
            colocated_joins_enabled: false,
            spatial_joins_enabled: true,
            join_reordering_strategy: JoinReorderingStrategy::Automatic,
            max_reordered_joins: 9,

            redistribute_writes: true,
            use_preferred_write_partitioning: true,
            preferred_write_partitioning_min_number_of_partitions: 50,
            scale_writers: false,
            writer_min_size: DataSize::of(32, DataUnit::Megabyte),

            optimize_metadata_queries: false,
            optimize_hash_generation: true,
            push_table_write_through_union: true,
            dictionary_aggregation: false,

            regex_library: RegexLibrary::Joni,
            re2j_dfa_states_limit: i32::MAX,
            re2j_dfa_retries: 5,

            spill_enabled: false,
            spill_order_by: true,
            spill_window_operator: true,
            aggregation_operator_unspill_memory_limit: DataSize::of(4, DataUnit::Megabyte),
            spiller_spill_paths: Vec::new(),
            spiller_threads: 4,
            spill_max_used_space_threshold: 0.9,
            memory_revoking_threshold: 0.9,
            memory_revoking_target: 0.5,

            optimize_mixed_distinct_aggregations: false,
            iterative_optimizer_timeout: Duration::of(3, TimeUnit::Minutes),
            enable_stats_calculator: true,
            statistics_precalculation_for_pushdown_enabled: false,
            collect_plan_statistics_for_all_queries: false,
            ignore_stats_calculator_failures: true,
            default_filter_factor_enabled: false,
            enable_forced_exchange_below_group_id: true,

            exchange_compression_enabled: false,
            exchange_data_integrity_verification: DataIntegrityVerification::Abort,

            legacy_row_to_json_cast: false,
            enable_intermediate_aggregations: false,
            push_aggregation_through_outer_join: true,
            push_partial_aggregation_through_join: false,
            parse_decimal_literals_as_double: false,
            force_single_node_output: true,
            pages_index_eager_compaction_enabled: false,
            filter_and_project_min_output_page_size: DataSize::of(500, DataUnit::Kilobyte),
            filter_and_project_min_output_page_row_count: 256,
            use_mark_distinct: true,
            prefer_partial_aggregation: true,
            optimize_top_n_ranking: true,
            distributed_sort_enabled: true,
            max_recursion_depth: 10,
            max_grouping_sets: 2048,
            late_materialization_enabled: false,
            skip_redundant_sort: true,
            predicate_pushdown_use_table_properties: true,
            ignore_downstream_preferences: false,
            omit_datetime_type_precision: false,
            iterative_rule_based_column_pruning: true,
            rewrite_filtering_semi_join_to_inner_join: true,
            optimize_duplicate_insensitive_joins: true,
            use_legacy_window_filter_pushdown: false,
            use_table_scan_node_partitioning: true,
            table_scan_node_partitioning_min_bucket_to_task_ratio: 0.5,
            merge_project_with_values: true,
            legacy_catalog_roles: false,
            disable_set_properties_security_check_for_create_ddl: false,
            incremental_hash_array_load_factor_enabled: true,
        }
    }
}
