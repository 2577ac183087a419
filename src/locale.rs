//! Localized Text
//!
//! User-facing labels and messages. The dashboard ships Simplified Chinese
//! as its primary locale with an English fallback.

use serde::{Deserialize, Serialize};

/// Display locale for labels, CSV headers and canned messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "zh-CN")]
    ZhCn,
    #[serde(rename = "en")]
    En,
}

/// Messages surfaced to the user by views, exports and the assistant
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Loading,
    LoadFailed,
    SaveFailed,
    DeleteFailed,
    ExportFailed,
    ExportSucceeded { files: usize },
    ConfirmDeleteOrder,
    RequiredOrderFields,
    RequiredProductFields,
    RequiredCustomerFields,
    NoOrders,
    NoProducts,
    NoCustomers,
    NoMatches,
    UntitledDocument,
    AssistantGreeting,
    AssistantApology,
    CanvasGenerating { topic: String },
    CanvasReady { topic: String },
    CanvasFailed,
    DraftSaved,
    DraftRestored,
    NoScratchDraft,
}

impl Locale {
    /// Parse a BCP-47-ish tag ("zh-CN", "zh", "en", "en-US")
    pub fn parse(tag: &str) -> Option<Self> {
        let lower = tag.trim().to_ascii_lowercase();
        if lower.starts_with("zh") {
            Some(Locale::ZhCn)
        } else if lower.starts_with("en") {
            Some(Locale::En)
        } else {
            None
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Locale::ZhCn => "zh-CN",
            Locale::En => "en",
        }
    }

    /// Render a message in this locale
    pub fn text(&self, message: &Message) -> String {
        match self {
            Locale::ZhCn => zh_cn(message),
            Locale::En => en(message),
        }
    }
}

fn zh_cn(message: &Message) -> String {
    match message {
        Message::Loading => "加载中...".to_string(),
        Message::LoadFailed => "加载失败，请重试".to_string(),
        Message::SaveFailed => "保存失败，请重试".to_string(),
        Message::DeleteFailed => "删除失败，请重试".to_string(),
        Message::ExportFailed => "导出失败，请重试".to_string(),
        Message::ExportSucceeded { files } => {
            format!("数据导出成功！已生成{}个CSV文件。", files)
        }
        Message::ConfirmDeleteOrder => "确定要删除这个订单吗？".to_string(),
        Message::RequiredOrderFields => "请填写客户姓名和邮箱".to_string(),
        Message::RequiredProductFields => "请填写产品名称".to_string(),
        Message::RequiredCustomerFields => "请填写客户姓名和邮箱".to_string(),
        Message::NoOrders => "暂无订单".to_string(),
        Message::NoProducts => "暂无产品".to_string(),
        Message::NoCustomers => "暂无客户".to_string(),
        Message::NoMatches => "没有符合条件的记录".to_string(),
        Message::UntitledDocument => "未命名文档".to_string(),
        Message::AssistantGreeting => "您好！我是您的AI商业助手。我可以帮助您分析销售数据、预测趋势、优化库存管理，以及提供个性化的商业建议。请问有什么可以帮您的？".to_string(),
        Message::AssistantApology => "抱歉，我暂时无法处理您的请求。".to_string(),
        Message::CanvasGenerating { topic } => format!("# {}\n\n正在生成内容...", topic),
        Message::CanvasReady { topic } => {
            format!("✅ 已为您生成文档『{}』，请在右侧画布中查看和编辑。", topic)
        }
        Message::CanvasFailed => "❌ 文档生成失败，请重试。".to_string(),
        Message::DraftSaved => "草稿已保存".to_string(),
        Message::DraftRestored => "草稿已恢复".to_string(),
        Message::NoScratchDraft => "没有已保存的草稿".to_string(),
    }
}

fn en(message: &Message) -> String {
    match message {
        Message::Loading => "Loading...".to_string(),
        Message::LoadFailed => "Failed to load, please retry".to_string(),
        Message::SaveFailed => "Failed to save, please retry".to_string(),
        Message::DeleteFailed => "Failed to delete, please retry".to_string(),
        Message::ExportFailed => "Export failed, please retry".to_string(),
        Message::ExportSucceeded { files } => {
            format!("Export complete: {} CSV file(s) generated.", files)
        }
        Message::ConfirmDeleteOrder => "Delete this order?".to_string(),
        Message::RequiredOrderFields => "Customer name and email are required".to_string(),
        Message::RequiredProductFields => "Product name is required".to_string(),
        Message::RequiredCustomerFields => "Customer name and email are required".to_string(),
        Message::NoOrders => "No orders yet".to_string(),
        Message::NoProducts => "No products yet".to_string(),
        Message::NoCustomers => "No customers yet".to_string(),
        Message::NoMatches => "No records match the current filters".to_string(),
        Message::UntitledDocument => "Untitled document".to_string(),
        Message::AssistantGreeting => "Hello! I'm your AI business assistant. I can analyze sales, forecast trends, tune inventory and suggest next steps. How can I help?".to_string(),
        Message::AssistantApology => "Sorry, I can't handle that request right now.".to_string(),
        Message::CanvasGenerating { topic } => format!("# {}\n\nGenerating content...", topic),
        Message::CanvasReady { topic } => {
            format!("✅ Document \"{}\" is ready in the canvas panel.", topic)
        }
        Message::CanvasFailed => "❌ Document generation failed, please retry.".to_string(),
        Message::DraftSaved => "Draft saved".to_string(),
        Message::DraftRestored => "Draft restored".to_string(),
        Message::NoScratchDraft => "No saved draft".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tags() {
        assert_eq!(Locale::parse("zh-CN"), Some(Locale::ZhCn));
        assert_eq!(Locale::parse("zh"), Some(Locale::ZhCn));
        assert_eq!(Locale::parse("en-US"), Some(Locale::En));
        assert_eq!(Locale::parse("fr"), None);
    }

    #[test]
    fn test_serde_tag() {
        let json = serde_json::to_string(&Locale::ZhCn).unwrap();
        assert_eq!(json, "\"zh-CN\"");
        let parsed: Locale = serde_json::from_str("\"en\"").unwrap();
        assert_eq!(parsed, Locale::En);
    }

    #[test]
    fn test_export_message() {
        let text = Locale::En.text(&Message::ExportSucceeded { files: 3 });
        assert!(text.contains('3'));
    }
}
