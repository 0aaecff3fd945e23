//! 结果分析生成模块
//! 按序匹配分类与标题关键词规则，用词表随机填充特质槽位生成分析文案

use rand::seq::SliceRandom;
use rand::Rng;
use regex::Regex;

use crate::models::{AnswerRecord, Category, Quiz};

// ==================== 特质词表 ====================

// 领导力
const LEADERSHIP_QUALITY: [&str; 4] = ["strong", "emerging", "collaborative", "thoughtful"];
const DECISION_TENDENCY: [&str; 4] = ["decisive", "consultative", "analytical", "intuitive"];
const RESILIENCE: [&str; 4] = [
    "high adaptability",
    "steady persistence",
    "creative problem-solving",
    "emotional intelligence",
];
const COMMUNICATION_STYLE: [&str; 4] = [
    "direct and clear",
    "diplomatic and thoughtful",
    "inspiring and motivational",
    "empathetic and supportive",
];
const LONG_TERM_VISION: [&str; 4] = [
    "strategic and forward-thinking",
    "practical and grounded",
    "innovative and creative",
    "collaborative and inclusive",
];

// 社交能量
const SOCIAL_PREFERENCE: [&str; 4] = ["extroverted", "introverted", "ambivert", "selectively social"];
const ENERGY_SOURCE: [&str; 4] = [
    "social interaction",
    "quiet reflection",
    "varied activities",
    "meaningful conversations",
];
const PROCESSING_MODE: [&str; 4] = [
    "external discussion",
    "internal reflection",
    "collaborative analysis",
    "intuitive assessment",
];
const EXPRESSION_STYLE: [&str; 4] = [
    "direct and open",
    "thoughtful and measured",
    "warm and engaging",
    "authentic and genuine",
];
const COPING_STYLE: [&str; 4] = [
    "seeking support",
    "independent processing",
    "active problem-solving",
    "creative outlets",
];

// 勇者气质
const COURAGE: [&str; 4] = [
    "fierce determination",
    "quiet strength",
    "strategic bravery",
    "protective instincts",
];
const LOYALTY: [&str; 4] = [
    "unwavering dedication",
    "earned trust",
    "protective devotion",
    "selective bonding",
];
const ADAPTABILITY: [&str; 4] = [
    "creative solutions",
    "flexible thinking",
    "resilient responses",
    "innovative approaches",
];
const CONFLICT_APPROACH: [&str; 4] = [
    "direct confrontation",
    "diplomatic resolution",
    "strategic planning",
    "collaborative problem-solving",
];
const MOTIVATION: [&str; 4] = [
    "protecting others",
    "personal growth",
    "achieving goals",
    "making a difference",
];

// 本真与传承
const AUTHENTICITY: [&str; 4] = [
    "strong authenticity",
    "evolving self-awareness",
    "value-driven choices",
    "genuine expression",
];
const VALUE_BASIS: [&str; 4] = [
    "core principles",
    "practical considerations",
    "relationship priorities",
    "long-term vision",
];
const RELATIONSHIP_DEPTH: [&str; 4] = [
    "emotional depth",
    "intellectual connection",
    "shared experiences",
    "mutual growth",
];
const LEGACY_FOCUS: [&str; 4] = [
    "inspiring others",
    "creating change",
    "building legacy",
    "meaningful contributions",
];

// 人格侧写
const PRIMARY_TRAIT: [&str; 4] = ["analytical", "creative", "social", "practical"];
const SECONDARY_TRAIT: [&str; 4] = ["empathetic", "decisive", "adaptable", "systematic"];
const PROBLEM_SOLVING: [&str; 4] = [
    "methodical analysis",
    "creative innovation",
    "collaborative approach",
    "intuitive insights",
];
const INTERPERSONAL_STYLE: [&str; 4] = [
    "engaging and outgoing",
    "thoughtful and observant",
    "supportive and caring",
    "independent and self-reliant",
];

// 爱的语言
const GIVING_STYLE: [&str; 4] = [
    "express love through actions",
    "show care through words",
    "demonstrate affection physically",
    "create quality experiences",
];
const RECEIVING_STYLE: [&str; 4] = [
    "someone shows practical support",
    "you hear affirming words",
    "you experience physical closeness",
    "you share meaningful time",
];
const NEEDS_COMMUNICATION: [&str; 4] = [
    "express needs directly",
    "prefer subtle indication",
    "seek collaborative discussion",
    "value emotional connection",
];
const CONFLICT_RESOLUTION: [&str; 4] = [
    "addressing issues openly",
    "taking time to process",
    "seeking understanding",
    "finding compromise",
];
const EMOTIONAL_SECURITY: [&str; 4] = [
    "consistency and reliability",
    "verbal affirmation",
    "physical presence",
    "shared experiences",
];
const CARE_EXPRESSION: [&str; 4] = [
    "thoughtful actions",
    "meaningful words",
    "physical affection",
    "quality time",
];

// 关系成熟度
const MATURITY_LEVEL: [&str; 4] = ["high", "developing", "situational", "growing"];
const COMMITMENT_STANCE: [&str; 4] = [
    "confidence and readiness",
    "cautious optimism",
    "fear but willingness",
    "uncertainty",
];
const CONFLICT_MANNER: [&str; 4] = ["constructively", "avoidantly", "emotionally", "analytically"];
const OPENNESS_STYLE: [&str; 4] = [
    "direct and honest",
    "gradual and careful",
    "emotionally expressive",
    "selectively sharing",
];
const EXPECTATION_MANNER: [&str; 4] = [
    "realistically",
    "optimistically",
    "cautiously",
    "flexibly",
];

// 警示信号觉察
const BLIND_SPOT: [&str; 4] = ["overlook", "rationalize", "minimize", "excuse"];
const RATIONALIZATION: [&str; 4] = [
    "make excuses for",
    "try to understand",
    "hope to change",
    "adapt to",
];
const BOUNDARY_HABIT: [&str; 4] = [
    "struggle with enforcing",
    "clearly communicate",
    "gradually establish",
    "inconsistently maintain",
];
const VULNERABILITY_LEVEL: [&str; 4] = ["heightened", "moderate", "low", "situational"];
const SELF_ADVOCACY: [&str; 4] = [
    "struggle to advocate",
    "confidently advocate",
    "selectively advocate",
    "learn to advocate",
];

// 依恋风格
const ATTACHMENT_STYLE: [&str; 4] = ["secure", "anxious", "avoidant", "disorganized"];
const COMMITMENT_PACE: [&str; 4] = [
    "with confidence",
    "with caution",
    "with hope",
    "with uncertainty",
];

// 情感叙事
const EMOTIONAL_CONNECTION: [&str; 4] = ["deep emotional", "intellectual", "empathetic", "analytical"];
const LITERARY_THEMES: [&str; 4] = [
    "resilience and growth",
    "love and relationships",
    "social justice",
    "personal transformation",
];
const CHARACTER_COMPLEXITY: [&str; 4] = ["complex", "relatable", "inspiring", "realistic"];
const EMPATHY_LEVEL: [&str; 4] = ["high", "developing", "situational", "cognitive"];
const SOCIAL_AWARENESS: [&str; 4] = ["strong", "growing", "selective", "intuitive"];

// 角色认同
const CHARACTER_PERSONALITY: [&str; 4] = [
    "strong, determined",
    "complex, flawed",
    "supportive, loyal",
    "independent, creative",
];
const STORY_THEMES: [&str; 4] = ["character-driven", "plot-focused", "emotional", "adventure-based"];
const CHARACTER_TRAITS: [&str; 4] = ["resilient", "authentic", "complex", "relatable"];
const MEDIA_VALUES: [&str; 4] = ["authenticity", "growth", "connection", "adventure"];
const CONSUMPTION_STYLE: [&str; 4] = ["immersive", "selective", "emotional", "analytical"];

// 浪漫偏好
const ROMANTIC_STYLE: [&str; 4] = [
    "practical and supportive",
    "passionate and intense",
    "thoughtful and steady",
    "adventurous and spontaneous",
];
const RELATIONSHIP_VALUES: [&str; 4] = [
    "honesty and directness",
    "emotional connection",
    "shared growth",
    "mutual respect",
];
const PARTNER_COMMUNICATION: [&str; 4] = ["direct", "thoughtful", "emotional", "collaborative"];
const PARTNER_QUALITY: [&str; 4] = [
    "intellectually stimulating",
    "emotionally supportive",
    "practically helpful",
    "adventurous and fun",
];
const LIFE_APPROACH: [&str; 4] = [
    "goal-oriented",
    "relationship-focused",
    "growth-minded",
    "balanced",
];

// 文化参与
const CULTURAL_ENGAGEMENT: [&str; 4] = ["broad", "selective", "deep", "growing"];
const NARRATIVE_PREFERENCE: [&str; 4] = ["character-driven", "plot-focused", "thematic", "emotional"];
const CHARACTER_TYPES: [&str; 4] = [
    "complex protagonists",
    "relatable characters",
    "strong leaders",
    "flawed heroes",
];

// 音乐常识
const KNOWLEDGE_BREADTH: [&str; 4] = ["impressive", "solid", "selective", "developing"];
const PATTERN_RECOGNITION: [&str; 4] = ["strong", "good", "moderate", "developing"];
const CULTURAL_AWARENESS: [&str; 4] = ["broad", "focused", "deep", "growing"];
const LEARNING_STYLE: [&str; 4] = ["auditory", "visual", "experiential", "analytical"];
const MEMORY_STRENGTH: [&str; 4] = ["factual", "contextual", "associative", "narrative"];

// 世界常识
const GLOBAL_AWARENESS: [&str; 4] = ["strong", "developing", "selective", "growing"];
const GEOGRAPHIC_LITERACY: [&str; 4] = ["excellent", "good", "moderate", "basic"];
const CULTURAL_KNOWLEDGE: [&str; 4] = ["diverse", "focused", "deep", "expanding"];
const FACTUAL_RETENTION: [&str; 4] = ["strong", "good", "selective", "contextual"];
const LEARNING_PREFERENCE: [&str; 4] = ["systematic", "exploratory", "social", "independent"];
const CURIOSITY_MANNER: [&str; 4] = [
    "show high curiosity",
    "demonstrate focused interest",
    "display selective curiosity",
    "exhibit growing interest",
];

// 生存直觉
const PRESSURE_DECISION: [&str; 4] = ["decisive", "analytical", "collaborative", "adaptive"];
const LEADERSHIP_POTENTIAL: [&str; 4] = ["strong", "emerging", "situational", "collaborative"];
const RESOURCE_MANAGEMENT: [&str; 4] = ["strategic", "practical", "collaborative", "adaptive"];
const MORAL_COMPASS: [&str; 4] = ["strong", "flexible", "practical", "situational"];
const CRISIS_HANDLING: [&str; 4] = [
    "high adaptability",
    "steady resilience",
    "creative flexibility",
    "practical adjustment",
];
const STRATEGIC_THINKING: [&str; 4] = [
    "highly strategic",
    "practically focused",
    "collaboratively oriented",
    "adaptively responsive",
];
const COLLABORATION_MANNER: [&str; 4] = [
    "work well",
    "prefer independence",
    "selectively collaborate",
    "naturally lead",
];

// 通用侧写
const THINKING_PATTERN: [&str; 4] = ["analytical", "creative", "intuitive", "systematic"];
const DECISION_APPROACH: [&str; 4] = ["methodical", "intuitive", "collaborative", "decisive"];
const SOCIAL_ORIENTATION: [&str; 4] = ["people-focused", "task-oriented", "balanced", "situational"];
const VALUE_SYSTEM: [&str; 4] = [
    "principle-based",
    "relationship-focused",
    "growth-oriented",
    "practical",
];
const CHALLENGE_APPROACH: [&str; 4] = [
    "methodical persistence",
    "creative adaptation",
    "collaborative strength",
    "independent determination",
];

/// 分析模板，每个对应一族固定句式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Template {
    Leadership,
    SocialEnergy,
    WarriorSpirit,
    LifeAuthenticity,
    PersonalityProfile,
    LoveLanguage,
    CommitmentReadiness,
    WarningSignAwareness,
    AttachmentPattern,
    EmotionalNarrative,
    CharacterIdentification,
    RomanticPreference,
    CulturalEngagement,
    MusicKnowledge,
    WorldKnowledge,
    SurvivalInstinct,
    GeneralProfile,
}

/// 单条匹配规则；按声明顺序求值，先命中者生效
struct ComposeRule {
    category: Option<Category>,
    title_pattern: Option<Regex>,
    template: Template,
}

impl ComposeRule {
    fn matches(&self, quiz: &Quiz) -> bool {
        if let Some(category) = self.category {
            if quiz.category != category {
                return false;
            }
        }
        if let Some(ref pattern) = self.title_pattern {
            if !pattern.is_match(&quiz.title) {
                return false;
            }
        }
        true
    }
}

/// 分析规则配置
///
/// 标题专属规则在前，分类通用规则在后；都未命中时落到通用侧写。
pub struct ComposerConfig {
    rules: Vec<ComposeRule>,
}

impl ComposerConfig {
    pub fn new() -> Self {
        let rule = |category: Option<Category>, pattern: Option<&str>, template: Template| {
            ComposeRule {
                category,
                title_pattern: pattern.map(|p| Regex::new(p).unwrap()),
                template,
            }
        };

        Self {
            rules: vec![
                rule(Some(Category::Personality), Some("Leader"), Template::Leadership),
                rule(
                    Some(Category::Personality),
                    Some("Introvert|Extrovert"),
                    Template::SocialEnergy,
                ),
                rule(Some(Category::Personality), Some("Dragon"), Template::WarriorSpirit),
                rule(
                    Some(Category::Personality),
                    Some("Evelyn Hugo"),
                    Template::LifeAuthenticity,
                ),
                rule(
                    Some(Category::LoveAndRelationships),
                    Some("Love Language"),
                    Template::LoveLanguage,
                ),
                rule(
                    Some(Category::LoveAndRelationships),
                    Some("Ready for"),
                    Template::CommitmentReadiness,
                ),
                rule(
                    Some(Category::LoveAndRelationships),
                    Some("Red Flag"),
                    Template::WarningSignAwareness,
                ),
                rule(
                    Some(Category::PopCulture),
                    Some("It Ends With Us"),
                    Template::EmotionalNarrative,
                ),
                rule(
                    Some(Category::PopCulture),
                    Some("TV Character"),
                    Template::CharacterIdentification,
                ),
                rule(
                    Some(Category::PopCulture),
                    Some("Theo or Charlie"),
                    Template::RomanticPreference,
                ),
                rule(Some(Category::Personality), None, Template::PersonalityProfile),
                rule(
                    Some(Category::LoveAndRelationships),
                    None,
                    Template::AttachmentPattern,
                ),
                rule(Some(Category::PopCulture), None, Template::CulturalEngagement),
                rule(Some(Category::Trivia), None, Template::MusicKnowledge),
                rule(Some(Category::GeneralKnowledge), None, Template::WorldKnowledge),
                rule(Some(Category::Hypotheticals), None, Template::SurvivalInstinct),
            ],
        }
    }
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// 结果分析生成器
pub struct AnalysisComposer {
    config: ComposerConfig,
}

impl AnalysisComposer {
    pub fn new() -> Self {
        Self::with_config(ComposerConfig::new())
    }

    pub fn with_config(config: ComposerConfig) -> Self {
        Self { config }
    }

    /// 生成分析文案
    ///
    /// rng 由调用方注入，固定种子与固定输入时输出逐字节可复现；
    /// 该策略只依据分类与标题，不读取逐题对错。
    pub fn compose<R: Rng + ?Sized>(
        &self,
        quiz: &Quiz,
        _log: &[AnswerRecord],
        rng: &mut R,
    ) -> String {
        let template = self
            .config
            .rules
            .iter()
            .find(|rule| rule.matches(quiz))
            .map(|rule| rule.template)
            .unwrap_or(Template::GeneralProfile);

        render(template, rng)
    }
}

impl Default for AnalysisComposer {
    fn default() -> Self {
        Self::new()
    }
}

fn pick<R: Rng + ?Sized>(rng: &mut R, vocabulary: &[&'static str]) -> &'static str {
    vocabulary.choose(rng).copied().unwrap()
}

fn render<R: Rng + ?Sized>(template: Template, rng: &mut R) -> String {
    match template {
        Template::Leadership => format!(
            "Based on your responses, you demonstrate {} leadership qualities. \
             Your approach to decision-making shows {} tendencies, and you handle \
             challenges with {}. You're likely to be {} in your communication style \
             and {} in your long-term thinking.",
            pick(rng, &LEADERSHIP_QUALITY),
            pick(rng, &DECISION_TENDENCY),
            pick(rng, &RESILIENCE),
            pick(rng, &COMMUNICATION_STYLE),
            pick(rng, &LONG_TERM_VISION),
        ),
        Template::SocialEnergy => format!(
            "Your responses indicate {} social preferences. You recharge through {} \
             and prefer {} when making decisions. Your communication style is {} and \
             you handle stress by {}.",
            pick(rng, &SOCIAL_PREFERENCE),
            pick(rng, &ENERGY_SOURCE),
            pick(rng, &PROCESSING_MODE),
            pick(rng, &EXPRESSION_STYLE),
            pick(rng, &COPING_STYLE),
        ),
        Template::WarriorSpirit => format!(
            "Your warrior spirit shows {} in facing challenges. You demonstrate {} \
             to those you care about and {} when overcoming obstacles. Your approach \
             to conflict is {} and your motivation comes from {}.",
            pick(rng, &COURAGE),
            pick(rng, &LOYALTY),
            pick(rng, &ADAPTABILITY),
            pick(rng, &CONFLICT_APPROACH),
            pick(rng, &MOTIVATION),
        ),
        Template::LifeAuthenticity => format!(
            "Your approach to life shows {} in staying true to yourself. You handle \
             public perception with {} and make decisions based on {}. Your \
             relationships are characterized by {} and your legacy focus is {}.",
            pick(rng, &AUTHENTICITY),
            pick(rng, &RESILIENCE),
            pick(rng, &VALUE_BASIS),
            pick(rng, &RELATIONSHIP_DEPTH),
            pick(rng, &LEGACY_FOCUS),
        ),
        Template::PersonalityProfile => format!(
            "Your personality profile shows {} characteristics with {} tendencies. \
             You approach challenges with {} and your interpersonal style is {}.",
            pick(rng, &PRIMARY_TRAIT),
            pick(rng, &SECONDARY_TRAIT),
            pick(rng, &PROBLEM_SOLVING),
            pick(rng, &INTERPERSONAL_STYLE),
        ),
        Template::LoveLanguage => format!(
            "Your love language profile suggests you {} and feel most loved when {}. \
             In relationships, you {} and handle conflicts by {}. Your emotional \
             needs are {} and you show care through {}.",
            pick(rng, &GIVING_STYLE),
            pick(rng, &RECEIVING_STYLE),
            pick(rng, &NEEDS_COMMUNICATION),
            pick(rng, &CONFLICT_RESOLUTION),
            pick(rng, &EMOTIONAL_SECURITY),
            pick(rng, &CARE_EXPRESSION),
        ),
        Template::CommitmentReadiness => format!(
            "Your readiness for serious relationships shows {} emotional maturity. \
             You handle commitment with {} and approach conflicts {}. Your \
             communication style is {} and you manage expectations {}.",
            pick(rng, &MATURITY_LEVEL),
            pick(rng, &COMMITMENT_STANCE),
            pick(rng, &CONFLICT_MANNER),
            pick(rng, &OPENNESS_STYLE),
            pick(rng, &EXPECTATION_MANNER),
        ),
        Template::WarningSignAwareness => format!(
            "Your relationship awareness shows you might {} certain warning signs. \
             You tend to {} concerning behaviors and {} when it comes to personal \
             boundaries. Your response to manipulation is {} and you {} for yourself.",
            pick(rng, &BLIND_SPOT),
            pick(rng, &RATIONALIZATION),
            pick(rng, &BOUNDARY_HABIT),
            pick(rng, &VULNERABILITY_LEVEL),
            pick(rng, &SELF_ADVOCACY),
        ),
        Template::AttachmentPattern => format!(
            "Your relationship patterns show {} attachment style with {} \
             communication preferences. You handle intimacy with {} and approach \
             commitment {}.",
            pick(rng, &ATTACHMENT_STYLE),
            pick(rng, &NEEDS_COMMUNICATION),
            pick(rng, &OPENNESS_STYLE),
            pick(rng, &COMMITMENT_PACE),
        ),
        Template::EmotionalNarrative => format!(
            "Your knowledge of this story shows {} connection to emotional \
             narratives. You appreciate {} in literature and {} character \
             complexity. Your understanding of the themes suggests {} empathy and {} \
             social awareness.",
            pick(rng, &EMOTIONAL_CONNECTION),
            pick(rng, &LITERARY_THEMES),
            pick(rng, &CHARACTER_COMPLEXITY),
            pick(rng, &EMPATHY_LEVEL),
            pick(rng, &SOCIAL_AWARENESS),
        ),
        Template::CharacterIdentification => format!(
            "Your responses suggest you identify with {} characters. You're drawn \
             to {} storylines and {} character traits. Your entertainment \
             preferences show {} values and {} approach to media consumption.",
            pick(rng, &CHARACTER_PERSONALITY),
            pick(rng, &STORY_THEMES),
            pick(rng, &CHARACTER_TRAITS),
            pick(rng, &MEDIA_VALUES),
            pick(rng, &CONSUMPTION_STYLE),
        ),
        Template::RomanticPreference => format!(
            "Your romantic preferences align with {} approaches to love. You value \
             {} in relationships and {} communication. Your ideal partner would be \
             {} and share your {} approach to life.",
            pick(rng, &ROMANTIC_STYLE),
            pick(rng, &RELATIONSHIP_VALUES),
            pick(rng, &PARTNER_COMMUNICATION),
            pick(rng, &PARTNER_QUALITY),
            pick(rng, &LIFE_APPROACH),
        ),
        Template::CulturalEngagement => format!(
            "Your pop culture knowledge reveals {} cultural engagement and {} \
             storytelling preferences. You connect with {} themes and {} character \
             types.",
            pick(rng, &CULTURAL_ENGAGEMENT),
            pick(rng, &NARRATIVE_PREFERENCE),
            pick(rng, &LITERARY_THEMES),
            pick(rng, &CHARACTER_TYPES),
        ),
        Template::MusicKnowledge => format!(
            "Your music knowledge shows {} familiarity with different genres and \
             eras. You demonstrate {} pattern recognition and {} cultural \
             awareness. Your responses suggest {} learning preferences and {} \
             memory strengths.",
            pick(rng, &KNOWLEDGE_BREADTH),
            pick(rng, &PATTERN_RECOGNITION),
            pick(rng, &CULTURAL_AWARENESS),
            pick(rng, &LEARNING_STYLE),
            pick(rng, &MEMORY_STRENGTH),
        ),
        Template::WorldKnowledge => format!(
            "Your general knowledge demonstrates {} global awareness and {} \
             geographic literacy. You show {} cultural knowledge and {} factual \
             retention. Your learning style appears to be {} and you {} about \
             world facts.",
            pick(rng, &GLOBAL_AWARENESS),
            pick(rng, &GEOGRAPHIC_LITERACY),
            pick(rng, &CULTURAL_KNOWLEDGE),
            pick(rng, &FACTUAL_RETENTION),
            pick(rng, &LEARNING_PREFERENCE),
            pick(rng, &CURIOSITY_MANNER),
        ),
        Template::SurvivalInstinct => format!(
            "Your survival instincts show {} decision-making under pressure. You \
             demonstrate {} leadership potential and {} resource management. Your \
             moral compass is {} and you handle crisis with {}. Your long-term \
             thinking is {} and you {} with others.",
            pick(rng, &PRESSURE_DECISION),
            pick(rng, &LEADERSHIP_POTENTIAL),
            pick(rng, &RESOURCE_MANAGEMENT),
            pick(rng, &MORAL_COMPASS),
            pick(rng, &CRISIS_HANDLING),
            pick(rng, &STRATEGIC_THINKING),
            pick(rng, &COLLABORATION_MANNER),
        ),
        Template::GeneralProfile => format!(
            "Your responses reveal {} thinking patterns and {} decision-making \
             approach. You demonstrate {} social orientation and {} problem-solving \
             style. Your values appear to be {} and your approach to challenges \
             is {}.",
            pick(rng, &THINKING_PATTERN),
            pick(rng, &DECISION_APPROACH),
            pick(rng, &SOCIAL_ORIENTATION),
            pick(rng, &PROBLEM_SOLVING),
            pick(rng, &VALUE_SYSTEM),
            pick(rng, &CHALLENGE_APPROACH),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn quiz_with(title: &str, category: Category) -> Quiz {
        Quiz {
            id: "quiz-1".to_string(),
            title: title.to_string(),
            description: String::new(),
            category,
            creator_id: "user-1".to_string(),
            participant_count: 0,
            average_score: 0.0,
            questions: Vec::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_dragon_title_selects_title_rule() {
        let composer = AnalysisComposer::new();
        let quiz = quiz_with("Which Dragon Rider Are You", Category::Personality);
        let mut rng = StdRng::seed_from_u64(42);

        let analysis = composer.compose(&quiz, &[], &mut rng);
        assert!(analysis.starts_with("Your warrior spirit shows"));
    }

    #[test]
    fn test_category_generic_without_known_keyword() {
        let composer = AnalysisComposer::new();
        let quiz = quiz_with("What Color Is Your Aura", Category::Personality);
        let mut rng = StdRng::seed_from_u64(42);

        let analysis = composer.compose(&quiz, &[], &mut rng);
        assert!(analysis.starts_with("Your personality profile shows"));
    }

    #[test]
    fn test_title_keyword_requires_matching_category() {
        let composer = AnalysisComposer::new();
        // 标题带关键词但分类不符时，走分类通用模板
        let quiz = quiz_with("Dragon Facts Challenge", Category::Trivia);
        let mut rng = StdRng::seed_from_u64(42);

        let analysis = composer.compose(&quiz, &[], &mut rng);
        assert!(analysis.starts_with("Your music knowledge shows"));
    }

    #[test]
    fn test_unrecognized_category_falls_back_to_generic() {
        let composer = AnalysisComposer::new();
        let quiz = quiz_with("Which Classic Novel Should You Read", Category::Books);
        let mut rng = StdRng::seed_from_u64(42);

        let analysis = composer.compose(&quiz, &[], &mut rng);
        assert!(analysis.starts_with("Your responses reveal"));
    }

    #[test]
    fn test_relationship_title_rules_in_order() {
        let composer = AnalysisComposer::new();
        let mut rng = StdRng::seed_from_u64(42);

        let readiness = composer.compose(
            &quiz_with("Are You Ready for a Relationship", Category::LoveAndRelationships),
            &[],
            &mut rng,
        );
        assert!(readiness.starts_with("Your readiness for serious relationships"));

        let red_flag = composer.compose(
            &quiz_with("Can You Spot the Red Flag", Category::LoveAndRelationships),
            &[],
            &mut rng,
        );
        assert!(red_flag.starts_with("Your relationship awareness shows"));
    }

    #[test]
    fn test_fixed_seed_reproduces_output() {
        let composer = AnalysisComposer::new();
        let quiz = quiz_with("Which Dragon Rider Are You", Category::Personality);

        let mut first_rng = StdRng::seed_from_u64(7);
        let mut second_rng = StdRng::seed_from_u64(7);
        let first = composer.compose(&quiz, &[], &mut first_rng);
        let second = composer.compose(&quiz, &[], &mut second_rng);

        assert_eq!(first, second);
    }

    #[test]
    fn test_different_seeds_vary_slots_within_template() {
        let composer = AnalysisComposer::new();
        let quiz = quiz_with("Which Dragon Rider Are You", Category::Personality);

        let outputs: Vec<String> = (0..8)
            .map(|seed| {
                let mut rng = StdRng::seed_from_u64(seed);
                composer.compose(&quiz, &[], &mut rng)
            })
            .collect();

        // 模板固定，槽位取值随种子变化
        assert!(outputs.iter().all(|o| o.starts_with("Your warrior spirit shows")));
        assert!(outputs.iter().any(|o| o != &outputs[0]));
    }
}
