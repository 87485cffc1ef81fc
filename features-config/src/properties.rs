//! Property table of [`FeaturesConfig`].
//!
//! Canonical keys and aliases are part of the deployment contract: operators
//! have them in property files, so a key is never renamed without keeping
//! the old name as an alias.

use qe_config_binding::Duration;
use qe_config_binding::DuplicateKeyError;
use qe_config_binding::Property;
use qe_config_binding::Registry;
use qe_config_binding::TimeUnit;

use crate::features::FeaturesConfig;

/// Properties that were removed. Setting one is an error.
pub const DEFUNCT_KEYS: &[&str] = &[
    "resource-group-manager",
    "experimental-syntax-enabled",
    "analyzer.experimental-syntax-enabled",
    "optimizer.processing-optimization",
    "deprecated.legacy-order-by",
    "deprecated.legacy-join-using",
    "deprecated.legacy-map-subscript",
    "deprecated.group-by-uses-equal",
    "legacy-timestamp",
    "deprecated.legacy-timestamp",
    "arrayagg.implementation",
    "multimapagg.implementation",
    "histogram.implementation",
];

/// `Property::new` for a field of `FeaturesConfig`, taking the default from
/// the same field of `$defaults`.
macro_rules! property {
    ($defaults:ident, $key:literal => $field:ident) => {
        Property::<FeaturesConfig, _>::new(
            $key,
            $defaults.$field,
            |c| &c.$field,
            |c| &mut c.$field,
        )
    };
}

/// Builds the registry of every feature property.
pub fn registry() -> Result<Registry<FeaturesConfig>, DuplicateKeyError> {
    let d = FeaturesConfig::default();
    let mut r: Registry<FeaturesConfig> = Registry::new();

    r.register(
        property!(d, "cpu-cost-weight" => cpu_cost_weight)
            .description("Relative weight of CPU in the cost model")
            .min(0.0),
    )?;
    r.register(
        property!(d, "memory-cost-weight" => memory_cost_weight)
            .description("Relative weight of memory in the cost model")
            .min(0.0),
    )?;
    r.register(
        property!(d, "network-cost-weight" => network_cost_weight)
            .description("Relative weight of network traffic in the cost model")
            .min(0.0),
    )?;

    r.register(property!(d, "distributed-index-joins-enabled" => distributed_index_joins_enabled))?;
    r.register(
        property!(d, "join-max-broadcast-table-size" => join_max_broadcast_table_size)
            .description("Largest estimated build side the optimizer will broadcast"),
    )?;
    r.register(
        property!(d, "join-distribution-type" => join_distribution_type)
            .description("Join distribution strategy"),
    )?;
    r.register(property!(d, "grouped-execution-enabled" => grouped_execution_enabled))?;
    r.register(
        property!(d, "dynamic-schedule-for-grouped-execution" => dynamic_schedule_for_grouped_execution),
    )?;
    r.register(
        property!(d, "concurrent-lifespans-per-task" => concurrent_lifespans_per_task)
            .description("Lifespans run concurrently per task; 0 means unlimited")
            .min(0),
    )?;
    r.register(property!(d, "colocated-joins-enabled" => colocated_joins_enabled))?;
    r.register(property!(d, "spatial-joins-enabled" => spatial_joins_enabled))?;
    r.register(
        property!(d, "optimizer.join-reordering-strategy" => join_reordering_strategy)
            .description("Join reordering strategy"),
    )?;
    r.register(
        property!(d, "optimizer.max-reordered-joins" => max_reordered_joins)
            .description("Largest join graph the cost-based reordering will consider"),
    )?;

    r.register(property!(d, "redistribute-writes" => redistribute_writes))?;
    r.register(property!(d, "use-preferred-write-partitioning" => use_preferred_write_partitioning))?;
    r.register(
        property!(
            d,
            "preferred-write-partitioning-min-number-of-partitions"
                => preferred_write_partitioning_min_number_of_partitions
        )
        .description("Use preferred write partitioning when the number of written partitions exceeds this limit")
        .min(1),
    )?;
    r.register(property!(d, "scale-writers" => scale_writers))?;
    r.register(property!(d, "writer-min-size" => writer_min_size))?;

    r.register(property!(d, "optimizer.optimize-metadata-queries" => optimize_metadata_queries))?;
    r.register(property!(d, "optimizer.optimize-hash-generation" => optimize_hash_generation))?;
    r.register(
        property!(d, "optimizer.push-table-write-through-union" => push_table_write_through_union),
    )?;
    r.register(property!(d, "optimizer.dictionary-aggregation" => dictionary_aggregation))?;

    r.register(property!(d, "regex-library" => regex_library))?;
    r.register(property!(d, "re2j.dfa-states-limit" => re2j_dfa_states_limit).min(2))?;
    r.register(property!(d, "re2j.dfa-retries" => re2j_dfa_retries).min(0))?;

    r.register(
        property!(d, "spill-enabled" => spill_enabled)
            .alias("experimental.spill-enabled")
            .description("Spill operator memory to disk when a query runs out of memory"),
    )?;
    r.register(property!(d, "spill-order-by" => spill_order_by).alias("experimental.spill-order-by"))?;
    r.register(
        property!(d, "spill-window-operator" => spill_window_operator)
            .alias("experimental.spill-window-operator"),
    )?;
    r.register(
        property!(d, "aggregation-operator-unspill-memory-limit" => aggregation_operator_unspill_memory_limit)
            .alias("experimental.aggregation-operator-unspill-memory-limit"),
    )?;
    r.register(
        property!(d, "spiller-spill-path" => spiller_spill_paths)
            .alias("experimental.spiller-spill-path")
            .description("Comma-separated directories for spill files"),
    )?;
    r.register(
        property!(d, "spiller-threads" => spiller_threads)
            .alias("experimental.spiller-threads")
            .min(1),
    )?;
    r.register(
        property!(d, "spiller-max-used-space-threshold" => spill_max_used_space_threshold)
            .alias("experimental.spiller-max-used-space-threshold")
            .description("Stop spilling to a path once its disk usage exceeds this fraction")
            .range(0.0, 1.0),
    )?;
    r.register(
        property!(d, "memory-revoking-threshold" => memory_revoking_threshold)
            .alias("experimental.memory-revoking-threshold")
            .description("Revoke memory when pool usage exceeds this fraction")
            .range(0.0, 1.0),
    )?;
    r.register(
        property!(d, "memory-revoking-target" => memory_revoking_target)
            .alias("experimental.memory-revoking-target")
            .description("Revoke memory until pool usage drops below this fraction")
            .range(0.0, 1.0),
    )?;

    r.register(
        property!(d, "optimizer.optimize-mixed-distinct-aggregations" => optimize_mixed_distinct_aggregations),
    )?;
    r.register(
        property!(d, "iterative-optimizer-timeout" => iterative_optimizer_timeout)
            .alias("experimental.iterative-optimizer-timeout")
            .min(Duration::of(1, TimeUnit::Milliseconds)),
    )?;
    r.register(
        property!(d, "enable-stats-calculator" => enable_stats_calculator)
            .alias("experimental.enable-stats-calculator")
            .description("Experimental: Enable statistics calculator"),
    )?;
    r.register(
        property!(
            d,
            "statistics-precalculation-for-pushdown.enabled"
                => statistics_precalculation_for_pushdown_enabled
        )
        .description("Enable statistics precalculation for pushdown"),
    )?;
    r.register(
        property!(d, "collect-plan-statistics-for-all-queries" => collect_plan_statistics_for_all_queries)
            .description("Collect plan statistics for non-EXPLAIN queries"),
    )?;
    r.register(
        property!(d, "optimizer.ignore-stats-calculator-failures" => ignore_stats_calculator_failures)
            .description("Ignore statistics calculator failures"),
    )?;
    r.register(
        property!(d, "optimizer.default-filter-factor-enabled" => default_filter_factor_enabled),
    )?;
    r.register(
        property!(d, "enable-forced-exchange-below-group-id" => enable_forced_exchange_below_group_id),
    )?;

    r.register(property!(d, "exchange.compression-enabled" => exchange_compression_enabled))?;
    r.register(
        property!(d, "exchange.data-integrity-verification" => exchange_data_integrity_verification),
    )?;

    r.register(
        property!(d, "legacy-row-to-json-cast" => legacy_row_to_json_cast)
            .alias("deprecated.legacy-row-to-json-cast"),
    )?;
    r.register(
        property!(d, "optimizer.enable-intermediate-aggregations" => enable_intermediate_aggregations),
    )?;
    r.register(
        property!(d, "optimizer.push-aggregation-through-outer-join" => push_aggregation_through_outer_join)
            .alias("optimizer.push-aggregation-through-join"),
    )?;
    r.register(
        property!(
            d,
            "optimizer.push-partial-aggregation-through-join" => push_partial_aggregation_through_join
        )
        .description("Push partial aggregations below joins"),
    )?;
    r.register(
        property!(d, "parse-decimal-literals-as-double" => parse_decimal_literals_as_double),
    )?;
    r.register(property!(d, "optimizer.force-single-node-output" => force_single_node_output))?;
    r.register(
        property!(d, "pages-index.eager-compaction-enabled" => pages_index_eager_compaction_enabled),
    )?;
    r.register(
        property!(d, "filter-and-project-min-output-page-size" => filter_and_project_min_output_page_size)
            .alias("experimental.filter-and-project-min-output-page-size"),
    )?;
    r.register(
        property!(
            d,
            "filter-and-project-min-output-page-row-count" => filter_and_project_min_output_page_row_count
        )
        .alias("experimental.filter-and-project-min-output-page-row-count")
        .min(0),
    )?;
    r.register(property!(d, "optimizer.use-mark-distinct" => use_mark_distinct))?;
    r.register(property!(d, "optimizer.prefer-partial-aggregation" => prefer_partial_aggregation))?;
    r.register(
        property!(d, "optimizer.optimize-top-n-ranking" => optimize_top_n_ranking)
            .alias("optimizer.optimize-top-n-row-number"),
    )?;
    r.register(property!(d, "distributed-sort" => distributed_sort_enabled))?;
    r.register(
        property!(d, "max-recursion-depth" => max_recursion_depth)
            .description("Maximum recursion depth for recursive common table expression")
            .min(1),
    )?;
    r.register(property!(d, "analyzer.max-grouping-sets" => max_grouping_sets).min(1))?;
    r.register(
        property!(d, "experimental.late-materialization.enabled" => late_materialization_enabled),
    )?;
    r.register(property!(d, "optimizer.skip-redundant-sort" => skip_redundant_sort))?;
    r.register(
        property!(
            d,
            "optimizer.predicate-pushdown-use-table-properties" => predicate_pushdown_use_table_properties
        ),
    )?;
    r.register(
        property!(d, "optimizer.ignore-downstream-preferences" => ignore_downstream_preferences),
    )?;
    r.register(
        property!(d, "omit-datetime-type-precision" => omit_datetime_type_precision)
            .alias("deprecated.omit-datetime-type-precision")
            .description("Enable compatibility mode for legacy clients when rendering datetime type names with default precision"),
    )?;
    r.register(
        property!(
            d,
            "optimizer.iterative-rule-based-column-pruning" => iterative_rule_based_column_pruning
        )
        .description("Use iterative rules to prune unreferenced columns"),
    )?;
    r.register(
        property!(
            d,
            "optimizer.rewrite-filtering-semi-join-to-inner-join" => rewrite_filtering_semi_join_to_inner_join
        ),
    )?;
    r.register(
        property!(
            d,
            "optimizer.optimize-duplicate-insensitive-joins" => optimize_duplicate_insensitive_joins
        ),
    )?;
    r.register(
        property!(
            d,
            "optimizer.use-legacy-window-filter-pushdown" => use_legacy_window_filter_pushdown
        ),
    )?;
    r.register(
        property!(
            d,
            "optimizer.use-table-scan-node-partitioning" => use_table_scan_node_partitioning
        )
        .description("Adapt plan to pre-partitioned tables"),
    )?;
    r.register(
        property!(
            d,
            "optimizer.table-scan-node-partitioning-min-bucket-to-task-ratio"
                => table_scan_node_partitioning_min_bucket_to_task_ratio
        )
        .description("Min table scan bucket to task ratio for which plan will be adopted to node pre-partitioned tables")
        .min(0.0),
    )?;
    r.register(property!(d, "optimizer.merge-project-with-values" => merge_project_with_values))?;
    r.register(
        property!(d, "legacy-catalog-roles" => legacy_catalog_roles)
            .alias("deprecated.legacy-catalog-roles")
            .description("Enable legacy role management syntax that assumed all roles are catalog scoped"),
    )?;
    r.register(
        property!(
            d,
            "disable-set-properties-security-check-for-create-ddl"
                => disable_set_properties_security_check_for_create_ddl
        )
        .alias("deprecated.disable-set-properties-security-check-for-create-ddl"),
    )?;
    r.register(
        property!(
            d,
            "incremental-hash-array-load-factor.enabled" => incremental_hash_array_load_factor_enabled
        )
        .description("Use smaller load factor for small hash arrays in order to improve performance"),
    )?;

    for key in DEFUNCT_KEYS {
        r.register_defunct(*key)?;
    }

    r.register_check(
        &["memory-revoking-target", "memory-revoking-threshold"],
        |c: &FeaturesConfig| {
            if c.memory_revoking_target <= c.memory_revoking_threshold {
                Ok(())
            } else {
                Err(format!(
                    "memory-revoking-target ({}) must not exceed memory-revoking-threshold ({})",
                    c.memory_revoking_target, c.memory_revoking_threshold
                ))
            }
        },
    );

    Ok(r)
}
