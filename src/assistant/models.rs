//! Model catalog and offline responses

use serde::{Deserialize, Serialize};

use crate::locale::Locale;

/// Chat models offered in the picker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Model {
    #[default]
    #[serde(rename = "gemini-3-pro")]
    Gemini3Pro,
    #[serde(rename = "claude-opus-4.5-thinking")]
    ClaudeOpusThinking,
    #[serde(rename = "grok-4.1-thinking")]
    GrokThinking,
    #[serde(rename = "gpt-5-thinking")]
    Gpt5Thinking,
}

impl Model {
    pub const ALL: [Model; 4] = [
        Model::Gemini3Pro,
        Model::ClaudeOpusThinking,
        Model::GrokThinking,
        Model::Gpt5Thinking,
    ];

    /// Name shown in the picker
    pub fn display_name(&self) -> &'static str {
        match self {
            Model::Gemini3Pro => "gemini-3-pro",
            Model::ClaudeOpusThinking => "claude-opus-4.5-thinking",
            Model::GrokThinking => "grok-4.1-thinking",
            Model::Gpt5Thinking => "gpt-5-thinking",
        }
    }

    /// Identifier sent to the chat function
    pub fn api_name(&self) -> &'static str {
        match self {
            Model::Gemini3Pro => "gemini-3-pro-preview",
            Model::ClaudeOpusThinking => "claude-opus-4-5-20251101-thinking",
            Model::GrokThinking => "grok-4-1-thinking-1129",
            Model::Gpt5Thinking => "gpt-5",
        }
    }

    pub fn description(&self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Model::Gemini3Pro, Locale::ZhCn) => "Google最新多模态模型",
            (Model::ClaudeOpusThinking, Locale::ZhCn) => "Anthropic深度推理模型",
            (Model::GrokThinking, Locale::ZhCn) => "xAI推理增强模型",
            (Model::Gpt5Thinking, Locale::ZhCn) => "OpenAI最新一代模型",
            (Model::Gemini3Pro, Locale::En) => "Google's latest multimodal model",
            (Model::ClaudeOpusThinking, Locale::En) => "Anthropic deep reasoning model",
            (Model::GrokThinking, Locale::En) => "xAI enhanced reasoning model",
            (Model::Gpt5Thinking, Locale::En) => "OpenAI's latest generation model",
        }
    }

    /// Accepts either the display name or the API name
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.display_name() == s || m.api_name() == s)
    }

    /// Replies used when the chat function cannot be reached
    pub fn canned_responses(&self) -> &'static [&'static str] {
        match self {
            Model::Gemini3Pro => &[
                "🔍 基于Gemini分析，您的销售数据显示过去30天内有显著增长。主要增长来源于手机配件类目，建议增加该类目的库存。",
                "📊 Gemini多模态分析完成：您的产品图片质量评分为87/100，建议优化主图的光线和角度以提升点击率。",
            ],
            Model::ClaudeOpusThinking => &[
                "🧠 [深度思考中...]\n\n经过多维度分析，我发现您的业务存在以下优化空间：\n1. VIP客户复购率可提升12%\n2. 库存周转率有15%改善空间\n3. 建议在Q1推出会员升级计划",
                "💡 Claude深度推理结果：基于客户行为模式，建议实施个性化推荐系统，预计可提升转化率18-22%。",
            ],
            Model::GrokThinking => &[
                "⚡ Grok快速分析：检测到5款产品库存低于安全线，其中AirPods Pro 2最为紧急，预计48小时内售罄。建议立即启动补货流程。",
                "🚀 实时市场洞察：竞品在本周推出了新促销活动，建议您考虑差异化策略，重点突出售后服务优势。",
            ],
            Model::Gpt5Thinking => &[
                "🎯 GPT-5综合分析报告：\n\n• 销售趋势：环比增长23%\n• 客户满意度：4.6/5.0\n• 运营效率：优化空间18%\n\n建议重点关注客户留存策略。",
                "📈 预测模型显示：如果维持当前增长势头，Q2营收预计可达上季度的135%。建议提前规划供应链扩容。",
            ],
        }
    }

    /// One canned reply, chosen by `entropy`
    pub fn canned_response(&self, entropy: u128) -> &'static str {
        let responses = self.canned_responses();
        responses[(entropy % responses.len() as u128) as usize]
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Quick prompts shown under an empty conversation
pub fn suggestions(locale: Locale) -> [&'static str; 4] {
    match locale {
        Locale::ZhCn => [
            "分析本月销售趋势",
            "查看库存预警产品",
            "推荐营销策略",
            "识别潜在风险客户",
        ],
        Locale::En => [
            "Analyze this month's sales trend",
            "Show products low on stock",
            "Suggest a marketing strategy",
            "Identify at-risk customers",
        ],
    }
}
