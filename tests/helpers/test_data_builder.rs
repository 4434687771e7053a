// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================
#![allow(dead_code)]

use chrono::NaiveDateTime;
use control_ans::domain::types::SourceTag;
use control_ans::domain::{InventoryLine, WorkOrderRecord};

// ==========================================
// WorkOrderRecord 构建器
// ==========================================

pub struct WorkOrderBuilder {
    order_id: String,
    activity: String,
    zone: String,
    start: Option<NaiveDateTime>,
    form_status: Option<String>,
    fields: Vec<(String, String)>,
}

impl WorkOrderBuilder {
    pub fn new(order_id: &str) -> Self {
        Self {
            order_id: order_id.to_string(),
            activity: "ACREV".to_string(),
            zone: "URBANO".to_string(),
            start: None,
            form_status: None,
            fields: Vec::new(),
        }
    }

    pub fn activity(mut self, activity: &str) -> Self {
        self.activity = activity.to_string();
        self
    }

    pub fn zone(mut self, zone: &str) -> Self {
        self.zone = zone.to_string();
        self
    }

    pub fn start(mut self, start: NaiveDateTime) -> Self {
        self.start = Some(start);
        self
    }

    pub fn form_status(mut self, status: &str) -> Self {
        self.form_status = Some(status.to_string());
        self
    }

    pub fn field(mut self, name: &str, value: &str) -> Self {
        self.fields.push((name.to_string(), value.to_string()));
        self
    }

    pub fn build(self) -> WorkOrderRecord {
        let mut fields = vec![("PEDIDO".to_string(), self.order_id.clone())];
        fields.extend(self.fields);
        WorkOrderRecord {
            row_number: 2,
            order_id: self.order_id,
            activity: self.activity,
            zone: self.zone,
            start: self.start,
            form_status: self.form_status,
            fields,
        }
    }
}

// ==========================================
// InventoryLine 构建器
// ==========================================

pub struct LineBuilder {
    order_id: String,
    item_code: String,
    quantity: f64,
    source: SourceTag,
    attributes: Vec<(String, String)>,
}

impl LineBuilder {
    /// A 侧明细
    pub fn a(order_id: &str, item_code: &str, quantity: f64) -> Self {
        Self::new(order_id, item_code, quantity, SourceTag::SourceA)
    }

    /// B 侧明细
    pub fn b(order_id: &str, item_code: &str, quantity: f64) -> Self {
        Self::new(order_id, item_code, quantity, SourceTag::SourceB)
    }

    fn new(order_id: &str, item_code: &str, quantity: f64, source: SourceTag) -> Self {
        Self {
            order_id: order_id.to_string(),
            item_code: item_code.to_string(),
            quantity,
            source,
            attributes: Vec::new(),
        }
    }

    pub fn attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.push((name.to_string(), value.to_string()));
        self
    }

    pub fn build(self) -> InventoryLine {
        InventoryLine {
            row_number: 0,
            order_id: self.order_id,
            item_code: self.item_code,
            quantity: self.quantity,
            source: self.source,
            attributes: self.attributes,
        }
    }
}
