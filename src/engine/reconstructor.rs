// ==========================================
// 铁路施工封锁申请 - 重建器 (Reconstructor)
// ==========================================
// 职责: 展平记录 (可能已带优化标注) → 原始形状的封锁申请
// 分组: combinationId ?? id, 输出顺序 = 分组首次出现顺序
// 有损: 安全/作业字段一律取默认值; 时刻锚定到参考日期
// 一致性:
// - 宽松模式 (默认): 孤立组合ID按单条处理, 同 id 无组合记录合并,
//   同一 id 分散在多个分组时并入首个分组; 记录告警
// - 严格模式: 遇到上述情形直接失败
// 红线: 输出中每个 id 至多出现一次 (回写按 id 覆盖)
// ==========================================

use crate::domain::{BlockRequest, FlatRecord, GroupKey, LineSection, OptimisationAnnotation};
use crate::engine::error::{ConsistencyIssue, TransformError, TransformResult};
use crate::engine::time_format::{expand_date, expand_time, TimeReference};
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};

/// 重建选项
#[derive(Debug, Clone, Copy, Default)]
pub struct ReconstructOptions {
    pub strict: bool,
    pub reference: TimeReference,
}

/// 重建结果 + 一致性告警
#[derive(Debug, Clone, Default)]
pub struct ReconstructReport {
    pub records: Vec<BlockRequest>,
    pub warnings: Vec<ConsistencyIssue>,
}

// ==========================================
// GroupBuilder - 单个分组的累加器
// ==========================================
// 所有输入消费完后才定型为 BlockRequest
struct GroupBuilder {
    key: GroupKey,
    id: String,
    date: String,
    demand_time_from: String,
    demand_time_to: String,
    selected_department: String,
    selected_section: String,
    selected_depo: String,
    mission_block: String,
    annotation: OptimisationAnnotation,
    sections: Vec<LineSection>,
    members: usize,
}

impl GroupBuilder {
    fn start(key: GroupKey, flat: FlatRecord, times: ExpandedTimes) -> Self {
        let section = section_from_flat(&flat);
        let annotation = if flat.annotation.is_set() {
            flat.annotation
        } else {
            OptimisationAnnotation::default()
        };

        Self {
            key,
            id: flat.id,
            date: times.date,
            demand_time_from: times.from,
            demand_time_to: times.to,
            selected_department: flat.selected_department,
            selected_section: flat.selected_section,
            selected_depo: flat.selected_depo,
            mission_block: flat.mission_block,
            annotation,
            sections: vec![section],
            members: 1,
        }
    }

    fn absorb(&mut self, flat: FlatRecord) {
        self.members += 1;

        if self.key.is_combination() {
            if let Some(comments) = flat.annotation.non_empty_comments() {
                self.annotation
                    .comments
                    .get_or_insert_with(Vec::new)
                    .extend_from_slice(comments);
            }
        }

        self.sections.push(section_from_flat(&flat));
    }

    /// 并入同 id 的另一分组: 区段追加在后, 批注追加
    fn merge(&mut self, other: GroupBuilder) {
        self.members += other.members;
        self.sections.extend(other.sections);

        if !self.annotation.is_set() {
            self.annotation = other.annotation;
        } else if let Some(comments) = other.annotation.non_empty_comments() {
            self.annotation
                .comments
                .get_or_insert_with(Vec::new)
                .extend_from_slice(comments);
        }
    }

    fn consistency_issue(&self) -> Option<ConsistencyIssue> {
        match &self.key {
            GroupKey::Combination(combination_id) if self.members == 1 => {
                Some(ConsistencyIssue::OrphanCombination {
                    combination_id: combination_id.clone(),
                    id: self.id.clone(),
                })
            }
            GroupKey::Record(id) if self.members > 1 => Some(ConsistencyIssue::AmbiguousRecord {
                id: id.clone(),
                members: self.members,
            }),
            _ => None,
        }
    }

    fn finish(self) -> BlockRequest {
        BlockRequest {
            id: self.id,
            date: self.date,
            demand_time_from: self.demand_time_from,
            demand_time_to: self.demand_time_to,
            selected_department: self.selected_department,
            selected_section: self.selected_section,
            selected_depo: self.selected_depo,
            mission_block: self.mission_block,
            work_type: String::new(),
            activity: String::new(),
            corridor_type: String::new(),
            processed_line_sections: self.sections,
            safety: Default::default(),
            user: Map::<String, Value>::new(),
            annotation: self.annotation,
        }
    }
}

struct ExpandedTimes {
    date: String,
    from: String,
    to: String,
}

/// 展平记录 → 区段
fn section_from_flat(flat: &FlatRecord) -> LineSection {
    let other = flat.other_affected_line.clone().unwrap_or_default();
    if flat.has_line() {
        LineSection::Line {
            block: flat.mission_block.clone(),
            line_name: flat.selected_line.clone().unwrap_or_default(),
            other_lines: Some(other),
        }
    } else {
        LineSection::Yard {
            block: flat.mission_block.clone(),
            stream: Some(flat.selected_stream.clone().unwrap_or_default()),
            road: Some(String::new()),
            other_roads: Some(other),
        }
    }
}

// ==========================================
// Reconstructor
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct Reconstructor {
    options: ReconstructOptions,
}

impl Reconstructor {
    pub fn new(options: ReconstructOptions) -> Self {
        Self { options }
    }

    /// 重建并丢弃告警
    pub fn reconstruct(&self, flat_records: Vec<FlatRecord>) -> TransformResult<Vec<BlockRequest>> {
        self.reconstruct_with_report(flat_records)
            .map(|report| report.records)
    }

    /// 重建并返回一致性告警
    pub fn reconstruct_with_report(
        &self,
        flat_records: Vec<FlatRecord>,
    ) -> TransformResult<ReconstructReport> {
        let input_len = flat_records.len();
        let mut index: HashMap<GroupKey, usize> = HashMap::new();
        let mut groups: Vec<GroupBuilder> = Vec::new();

        for flat in flat_records {
            // 每条记录都校验格式, 不只是分组首条
            let times = self.expand_times(&flat)?;
            let key = flat.group_key();

            match index.get(&key) {
                Some(&pos) => groups[pos].absorb(flat),
                None => {
                    index.insert(key.clone(), groups.len());
                    groups.push(GroupBuilder::start(key, flat, times));
                }
            }
        }

        let mut warnings = Vec::new();
        for group in &groups {
            if let Some(issue) = group.consistency_issue() {
                self.report_issue(issue, &mut warnings)?;
            }
        }
        let groups = self.fold_split_records(groups, &mut warnings)?;

        let records: Vec<BlockRequest> = groups.into_iter().map(GroupBuilder::finish).collect();
        tracing::debug!(
            "重建完成: 展平记录 {} 条 → 申请 {} 条, 告警 {} 条",
            input_len,
            records.len(),
            warnings.len()
        );

        Ok(ReconstructReport { records, warnings })
    }

    /// 严格模式下直接失败, 宽松模式下记录告警
    fn report_issue(
        &self,
        issue: ConsistencyIssue,
        warnings: &mut Vec<ConsistencyIssue>,
    ) -> TransformResult<()> {
        if self.options.strict {
            return Err(TransformError::Consistency(issue));
        }
        tracing::warn!("重建一致性告警: {}", issue);
        warnings.push(issue);
        Ok(())
    }

    /// 同一 id 的多个分组并入首个分组
    fn fold_split_records(
        &self,
        groups: Vec<GroupBuilder>,
        warnings: &mut Vec<ConsistencyIssue>,
    ) -> TransformResult<Vec<GroupBuilder>> {
        let mut group_counts: HashMap<&str, usize> = HashMap::new();
        for group in &groups {
            *group_counts.entry(group.id.as_str()).or_default() += 1;
        }

        let mut reported: HashSet<&str> = HashSet::new();
        for group in &groups {
            let count = group_counts[group.id.as_str()];
            if count > 1 && reported.insert(group.id.as_str()) {
                self.report_issue(
                    ConsistencyIssue::SplitRecord {
                        id: group.id.clone(),
                        groups: count,
                    },
                    warnings,
                )?;
            }
        }
        if reported.is_empty() {
            return Ok(groups);
        }

        let mut first_index: HashMap<String, usize> = HashMap::new();
        let mut folded: Vec<GroupBuilder> = Vec::with_capacity(groups.len());
        for group in groups {
            match first_index.get(&group.id) {
                Some(&pos) => folded[pos].merge(group),
                None => {
                    first_index.insert(group.id.clone(), folded.len());
                    folded.push(group);
                }
            }
        }
        Ok(folded)
    }

    fn expand_times(&self, flat: &FlatRecord) -> TransformResult<ExpandedTimes> {
        let reference = &self.options.reference;
        Ok(ExpandedTimes {
            date: expand_date(&flat.id, "date", &flat.date, reference)?,
            from: expand_time(&flat.id, "demandTimeFrom", &flat.demand_time_from, reference)?,
            to: expand_time(&flat.id, "demandTimeTo", &flat.demand_time_to, reference)?,
        })
    }
}

/// 宽松模式、默认参考日期下重建
pub fn reconstruct(flat_records: Vec<FlatRecord>) -> TransformResult<Vec<BlockRequest>> {
    Reconstructor::default().reconstruct(flat_records)
}
