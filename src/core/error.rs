//! 错误类型：规划期错误与总结生成错误
//!
//! 规划期错误（RouteError）在派送开始前就被处理完；SummaryError 只影响「庆祝」动作，
//! 不会回滚派送进度或计时器状态。计时器的非法转换不是错误，由状态机直接忽略。

use thiserror::Error;

/// 路线规划错误（DistanceModel / RouteSolver）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// 站点列表或矩阵不合法：空列表、非方阵、坐标非有限值
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// 没有可行的巡回路线（存在不可达的站点）；调用方应回退为原始顺序
    #[error("Solver failure: {0}")]
    SolverFailure(String),
}

/// 总结生成错误（外部文本生成服务）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SummaryError {
    /// 未设置凭据环境变量
    #[error("Configuration error: environment variable {0} not set")]
    MissingCredential(String),

    /// 服务不可达、超时或拒绝请求（如凭据无效）
    #[error("Configuration error: summary service failed ({0})")]
    Service(String),

    /// 服务返回了空内容；不把空白当作成功
    #[error("Summary service returned an empty message")]
    EmptyResponse,

    /// 还有派送未完成，不能生成总结
    #[error("Deliveries are not complete yet ({remaining} remaining)")]
    NotComplete { remaining: usize },
}

impl SummaryError {
    /// 是否属于配置类错误（凭据缺失 / 服务不可达）
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            SummaryError::MissingCredential(_) | SummaryError::Service(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_classification() {
        assert!(SummaryError::MissingCredential("KEY".into()).is_configuration());
        assert!(SummaryError::Service("timeout".into()).is_configuration());
        assert!(!SummaryError::EmptyResponse.is_configuration());
        assert!(!SummaryError::NotComplete { remaining: 3 }.is_configuration());
    }

    #[test]
    fn test_missing_credential_message_names_variable() {
        let err = SummaryError::MissingCredential("AZURE_INFERENCE_KEY".into());
        assert!(err.to_string().contains("AZURE_INFERENCE_KEY"));
    }
}
