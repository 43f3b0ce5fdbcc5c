// Copyright (c) 2025 Templated SQL LSP Team
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Child Slot Vocabulary
//!
//! Every field name that can hold a child node (or list of child nodes)
//! anywhere in the analyzer's resolved-statement schema. The decoder
//! walks this table instead of probing arbitrary object fields, so
//! traversal cost is proportional to the schema's actual shape.
//!
//! This list is a contract with the external analyzer: when its schema
//! gains a new child slot, the slot must be added here or subtrees under
//! it become unreachable. Data-carrying fields (`columnList`, `table`,
//! `parseLocationRange`, ...) are deliberately absent; they are decoded
//! as node attributes, not children.

/// Whether a slot holds a single child node or an ordered list of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotArity {
    Scalar,
    List,
}

/// A named child slot in the analyzer schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildSlot {
    pub name: &'static str,
    pub arity: SlotArity,
}

const fn scalar(name: &'static str) -> ChildSlot {
    ChildSlot {
        name,
        arity: SlotArity::Scalar,
    }
}

const fn list(name: &'static str) -> ChildSlot {
    ChildSlot {
        name,
        arity: SlotArity::List,
    }
}

/// The full slot vocabulary, in schema order.
pub const CHILD_SLOTS: &[ChildSlot] = &[
    list("aggregateExpressionList"),
    list("aggregateList"),
    list("annotations"),
    list("anonymizationOptionList"),
    list("argumentList"),
    list("arguments"),
    scalar("arrayExpr"),
    scalar("arrayOffsetColumn"),
    scalar("assertRowsModified"),
    scalar("body"),
    list("childList"),
    scalar("cloneFrom"),
    list("clusterByList"),
    scalar("collationName"),
    list("columnDefinitionList"),
    scalar("columnRef"),
    list("computedColumnsList"),
    scalar("connection"),
    scalar("defaultExpression"),
    scalar("descriptorArg"),
    list("elementList"),
    scalar("expr"),
    scalar("expression"),
    list("exprList"),
    scalar("extendedCast"),
    list("fieldList"),
    scalar("filterExpr"),
    list("filterFieldArgList"),
    scalar("format"),
    scalar("forSystemTimeExpr"),
    scalar("fromScan"),
    scalar("functionExpression"),
    list("functionGroupList"),
    scalar("generatedColumnInfo"),
    list("genericArgumentList"),
    list("getFieldList"),
    list("granteeExprList"),
    list("groupByColumnList"),
    list("groupByList"),
    list("groupingSetList"),
    scalar("havingModifier"),
    list("hintList"),
    list("indexItemList"),
    scalar("inExpr"),
    scalar("inlineLambda"),
    list("inputColumnList"),
    list("inputItemList"),
    scalar("inputScan"),
    scalar("joinExpr"),
    scalar("kThresholdExpr"),
    scalar("leftScan"),
    scalar("likeExpr"),
    scalar("limit"),
    scalar("mergeExpr"),
    scalar("model"),
    scalar("offset"),
    list("optionList"),
    list("orderByItemList"),
    list("outputColumnList"),
    list("parameterList"),
    list("partitionByList"),
    scalar("predicate"),
    scalar("query"),
    list("queryParameterList"),
    scalar("repeatableArgument"),
    list("replaceFieldItemList"),
    scalar("returning"),
    scalar("rightScan"),
    list("rollupColumnList"),
    list("rowList"),
    scalar("scan"),
    scalar("signature"),
    scalar("size"),
    scalar("sql"),
    scalar("statement"),
    list("storingExpressionList"),
    scalar("subquery"),
    list("tableAndColumnIndexList"),
    scalar("tableScan"),
    scalar("target"),
    scalar("targetTable"),
    scalar("timeZone"),
    list("transformAnalyticFunctionGroupList"),
    list("transformInputColumnList"),
    list("transformList"),
    list("transformOutputColumnList"),
    list("unnestExpressionsList"),
    list("usingArgumentList"),
    scalar("weightColumn"),
    list("whenClauseList"),
    scalar("whereExpr"),
    scalar("windowFrame"),
    list("withEntryList"),
    list("withGroupRowsParameterList"),
    scalar("withGroupRowsSubquery"),
    scalar("withPartitionColumns"),
    scalar("withSubquery"),
];
