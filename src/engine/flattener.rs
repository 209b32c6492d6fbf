// ==========================================
// 铁路施工封锁申请 - 展平器 (Flattener)
// ==========================================
// 职责: 嵌套的封锁申请 → 每区段一行的展平记录
// 规则:
// 1. 区段数 > 1: 整条申请共用一个新生成的 combinationId
// 2. 区段数 <= 1: combinationId 为空
// 3. 无区段: 以申请自身 missionBlock 输出一行
// 4. 日期 → yyyy-MM-dd, 时刻 → HH:mm (有损)
// 红线: 任一记录时间解析失败则整批失败, 不跳过
// ==========================================

use crate::domain::{BlockRequest, FlatRecord, LineSection, OptimisationAnnotation};
use crate::engine::error::TransformResult;
use crate::engine::time_format::{to_canonical_date, to_canonical_time};
use uuid::Uuid;

/// 组合ID生成器
pub type CombinationIdSource = Box<dyn Fn() -> String + Send + Sync>;

pub struct Flattener {
    next_combination_id: CombinationIdSource,
}

impl Default for Flattener {
    fn default() -> Self {
        Self {
            next_combination_id: Box::new(|| Uuid::new_v4().to_string()),
        }
    }
}

impl Flattener {
    pub fn new() -> Self {
        Self::default()
    }

    /// 使用自定义组合ID生成器 (必须进程内唯一)
    pub fn with_id_source(next_combination_id: CombinationIdSource) -> Self {
        Self {
            next_combination_id,
        }
    }

    /// 展平一批申请; 输出顺序 = 输入顺序, 申请内按区段顺序
    pub fn flatten(&self, records: &[BlockRequest]) -> TransformResult<Vec<FlatRecord>> {
        let mut flat = Vec::with_capacity(records.iter().map(BlockRequest::flat_len).sum());

        for record in records {
            self.flatten_one(record, &mut flat)?;
        }

        tracing::debug!(
            "展平完成: 申请 {} 条 → 展平记录 {} 条",
            records.len(),
            flat.len()
        );
        Ok(flat)
    }

    fn flatten_one(&self, record: &BlockRequest, out: &mut Vec<FlatRecord>) -> TransformResult<()> {
        let date = to_canonical_date(&record.id, "date", &record.date)?;
        let time_from = to_canonical_time(&record.id, "demandTimeFrom", &record.demand_time_from)?;
        let time_to = to_canonical_time(&record.id, "demandTimeTo", &record.demand_time_to)?;

        let combination_id = if record.processed_line_sections.len() > 1 {
            Some((self.next_combination_id)())
        } else {
            None
        };

        let base = FlatRecord {
            id: record.id.clone(),
            combination_id,
            date,
            demand_time_from: time_from,
            demand_time_to: time_to,
            selected_department: record.selected_department.clone(),
            selected_section: record.selected_section.clone(),
            selected_depo: record.selected_depo.clone(),
            selected_line: None,
            other_affected_line: None,
            selected_stream: None,
            mission_block: record.mission_block.clone(),
            annotation: OptimisationAnnotation::default(),
        };

        if record.processed_line_sections.is_empty() {
            out.push(base);
            return Ok(());
        }

        for section in &record.processed_line_sections {
            out.push(Self::apply_section(base.clone(), section));
        }
        Ok(())
    }

    /// 把一个区段的线路/股道信息折叠进展平记录
    fn apply_section(mut flat: FlatRecord, section: &LineSection) -> FlatRecord {
        flat.selected_line = section.line_name().map(str::to_string);
        flat.other_affected_line = section.other_affected().map(str::to_string);
        flat.selected_stream = section.stream().map(str::to_string);
        flat.mission_block = section.block().to_string();
        flat
    }
}

/// 使用 UUID 组合ID展平
pub fn flatten(records: &[BlockRequest]) -> TransformResult<Vec<FlatRecord>> {
    Flattener::default().flatten(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::error::TransformError;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn request(id: &str, sections: Vec<LineSection>) -> BlockRequest {
        BlockRequest {
            id: id.to_string(),
            date: "2024-03-10T00:00:00Z".to_string(),
            demand_time_from: "2024-03-10T06:15:00Z".to_string(),
            demand_time_to: "2024-03-10T07:45:00Z".to_string(),
            selected_department: "ENGG".to_string(),
            selected_section: "BZA-GDR".to_string(),
            selected_depo: "SSE/P.WAY".to_string(),
            mission_block: "BLK".to_string(),
            processed_line_sections: sections,
            ..Default::default()
        }
    }

    fn line(block: &str, name: &str, others: &str) -> LineSection {
        LineSection::Line {
            block: block.to_string(),
            line_name: name.to_string(),
            other_lines: Some(others.to_string()),
        }
    }

    fn yard(block: &str, stream: &str, road: &str, others: &str) -> LineSection {
        LineSection::Yard {
            block: block.to_string(),
            stream: Some(stream.to_string()),
            road: Some(road.to_string()),
            other_roads: Some(others.to_string()),
        }
    }

    #[test]
    fn test_multi_section_shares_one_combination_id() {
        let records = vec![request(
            "r1",
            vec![
                line("A", "UP", ""),
                line("B", "DN", ""),
                yard("C", "A", "1", ""),
            ],
        )];

        let flat = flatten(&records).unwrap();
        assert_eq!(flat.len(), 3);

        let combo = flat[0].combination_id.clone();
        assert!(combo.is_some());
        assert!(flat.iter().all(|f| f.combination_id == combo));
        assert!(flat.iter().all(|f| f.id == "r1"));
        let blocks: Vec<&str> = flat.iter().map(|f| f.mission_block.as_str()).collect();
        assert_eq!(blocks, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_single_and_zero_sections_have_no_combination_id() {
        let records = vec![
            request("one", vec![line("A", "UP", "")]),
            request("zero", vec![]),
        ];

        let flat = flatten(&records).unwrap();
        assert_eq!(flat.len(), 2);
        assert!(flat.iter().all(|f| f.combination_id.is_none()));
    }

    #[test]
    fn test_zero_sections_fall_back_to_mission_block() {
        let mut record = request("y1", vec![]);
        record.mission_block = "YARD1".to_string();

        let flat = flatten(&[record]).unwrap();
        assert_eq!(flat.len(), 1);
        assert_eq!(flat[0].mission_block, "YARD1");
        assert_eq!(flat[0].selected_line, None);
        assert_eq!(flat[0].combination_id, None);
    }

    #[test]
    fn test_line_and_road_discrimination() {
        let records = vec![request(
            "r1",
            vec![line("A", "UP", "DN,SL"), yard("B", "A", "3", "4,5")],
        )];

        let flat = flatten(&records).unwrap();
        assert_eq!(flat[0].selected_line.as_deref(), Some("UP"));
        assert_eq!(flat[0].other_affected_line.as_deref(), Some("DN,SL"));
        assert_eq!(flat[0].selected_stream, None);

        assert_eq!(flat[1].selected_line, None);
        assert_eq!(flat[1].other_affected_line.as_deref(), Some("4,5"));
        assert_eq!(flat[1].selected_stream.as_deref(), Some("A"));
    }

    #[test]
    fn test_canonical_formats_and_copied_fields() {
        let flat = flatten(&[request("r1", vec![line("A", "UP", "")])]).unwrap();
        let row = &flat[0];
        assert_eq!(row.date, "2024-03-10");
        assert_eq!(row.demand_time_from, "06:15");
        assert_eq!(row.demand_time_to, "07:45");
        assert_eq!(row.selected_department, "ENGG");
        assert_eq!(row.selected_section, "BZA-GDR");
        assert_eq!(row.selected_depo, "SSE/P.WAY");
        assert!(!row.annotation.is_set());
    }

    #[test]
    fn test_combination_ids_unique_across_records() {
        let records: Vec<BlockRequest> = (0..20)
            .map(|i| {
                request(
                    &format!("r{}", i),
                    vec![line("A", "UP", ""), line("B", "DN", "")],
                )
            })
            .collect();

        let flat = flatten(&records).unwrap();
        let combos: HashSet<String> = flat.iter().filter_map(|f| f.combination_id.clone()).collect();
        assert_eq!(combos.len(), 20);
    }

    #[test]
    fn test_custom_id_source() {
        let counter = AtomicUsize::new(0);
        let flattener = Flattener::with_id_source(Box::new(move || {
            format!("combo-{}", counter.fetch_add(1, Ordering::SeqCst))
        }));

        let records = vec![
            request("r1", vec![line("A", "UP", ""), line("B", "DN", "")]),
            request("r2", vec![line("C", "UP", "")]),
            request("r3", vec![line("D", "UP", ""), line("E", "DN", "")]),
        ];
        let flat = flattener.flatten(&records).unwrap();
        let combos: Vec<Option<&str>> = flat.iter().map(|f| f.combination_id.as_deref()).collect();
        assert_eq!(
            combos,
            vec![
                Some("combo-0"),
                Some("combo-0"),
                None,
                Some("combo-1"),
                Some("combo-1")
            ]
        );
    }

    #[test]
    fn test_unparseable_time_fails_whole_batch() {
        let good = request("ok", vec![]);
        let mut bad = request("bad", vec![line("A", "UP", "")]);
        bad.demand_time_from = "not-a-date".to_string();

        let err = flatten(&[good, bad]).unwrap_err();
        assert!(matches!(
            err,
            TransformError::FormatError { ref id, field: "demandTimeFrom", .. } if id == "bad"
        ));
    }
}
