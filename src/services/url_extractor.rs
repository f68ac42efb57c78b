//! URL 提取 - 业务能力层
//!
//! 对抓取到的原始页面文本做正则匹配。页面结构一旦变化只会返回空结果，不会报错。

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// 文本 → URL 列表
pub trait UrlExtractor: Send + Sync {
    fn extract(&self, text: &str) -> Vec<String>;
}

static EMPLOYEE_LIST_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"https://www\.linkedin\.com/search/results/people/\?[^"\s]*"#)
        .expect("employee list pattern is valid")
});

static EMPLOYEE_PROFILE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""navigationUrl":"(https?://(?:www\.)?linkedin\.com/in/([a-zA-Z0-9_-]+)(?:\?[^"]*)?)"#)
        .expect("employee profile pattern is valid")
});

/// 公司员工搜索页 URL（必须带 `currentCompany=`），最多一个
#[derive(Debug, Default, Clone, Copy)]
pub struct EmployeeListUrlExtractor;

impl UrlExtractor for EmployeeListUrlExtractor {
    fn extract(&self, text: &str) -> Vec<String> {
        extract_employee_list_url(text).into_iter().collect()
    }
}

/// 员工个人主页 URL，去掉查询参数后按主页去重
#[derive(Debug, Default, Clone, Copy)]
pub struct EmployeeProfileUrlExtractor;

impl UrlExtractor for EmployeeProfileUrlExtractor {
    fn extract(&self, text: &str) -> Vec<String> {
        extract_employee_profile_urls(text)
    }
}

/// 返回第一个包含 `currentCompany=` 的员工搜索 URL
pub fn extract_employee_list_url(text: &str) -> Option<String> {
    EMPLOYEE_LIST_URL
        .find_iter(text)
        .map(|m| m.as_str())
        .find(|url| url.contains("currentCompany="))
        .map(str::to_string)
}

/// 提取 `"navigationUrl":"…linkedin.com/in/…"` 中的主页 URL
///
/// 同一个主页（相同 slug，不论是否带 `www.`）只保留第一次出现的形式。
pub fn extract_employee_profile_urls(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut urls = Vec::new();

    for caps in EMPLOYEE_PROFILE_URL.captures_iter(text) {
        let (Some(full), Some(slug)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        let clean = full.as_str().split('?').next().unwrap_or_default();
        if clean.is_empty() {
            continue;
        }
        if seen.insert(slug.as_str().to_string()) {
            urls.push(clean.to_string());
        }
    }

    urls
}
